#![warn(missing_docs)]
//! Finger table of the ring.
use derivative::Derivative;
use serde::Deserialize;
use serde::Serialize;

use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::error::Error;
use crate::error::Result;

/// Finger table of Chord DHT.
/// Slot `i` caches the successor of `local + 2^i`.
#[derive(Derivative, Clone, Debug, Serialize, Deserialize)]
#[derivative(PartialEq)]
pub struct FingerTable {
    finger: Vec<Option<ContactInfo>>,
    #[derivative(PartialEq = "ignore")]
    next: usize,
}

impl FingerTable {
    /// builder
    pub fn new(size: usize) -> Self {
        Self {
            finger: vec![None; size],
            next: 0,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.finger.len()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// getter
    pub fn get(&self, index: usize) -> Option<&ContactInfo> {
        self.finger.get(index).and_then(|x| x.as_ref())
    }

    /// Set slot `index` and report whether the stored id changed.
    /// Address or payload drift of the same id is kept but does not count as a change.
    pub fn set(&mut self, index: usize, contact: Option<ContactInfo>) -> Result<bool> {
        let size = self.len();
        let slot = self
            .finger
            .get_mut(index)
            .ok_or(Error::FingerIndexOutOfRange { index, size })?;
        let changed = slot.as_ref().map(|c| c.id) != contact.as_ref().map(|c| c.id);
        if changed {
            tracing::debug!("set finger {} to {:?}", index, contact.as_ref().map(|c| c.id));
        }
        *slot = contact;
        Ok(changed)
    }

    /// Slot the next fix fingers round works on.
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Move the round robin cursor forward, wrapping at the table size.
    pub fn advance(&mut self) {
        if !self.is_empty() {
            self.next = (self.next + 1) % self.len();
        }
    }

    /// Scan fingers from the highest slot down and return the first one lying
    /// strictly between `local` and `id`. Empty slots are skipped.
    pub fn closest_preceding(&self, local: NodeId, id: NodeId) -> Option<&ContactInfo> {
        self.finger
            .iter()
            .rev()
            .flatten()
            .find(|c| c.id.between_open(local, id))
    }

    /// All slots, in index order.
    pub fn list(&self) -> &[Option<ContactInfo>] {
        &self.finger
    }
}
