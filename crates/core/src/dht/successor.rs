//! Successor list for PeerRing
use serde::Deserialize;
use serde::Serialize;

use crate::dht::ContactInfo;
use crate::error::Error;
use crate::error::Result;

/// A fixed size sequence of successors for a node on the ring.
/// It's necessary to have multiple successors to prevent a single point of failure.
/// Slot 0 is the immediate successor, slot `i + 1` is the successor of slot `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessorList {
    successors: Vec<Option<ContactInfo>>,
}

impl SuccessorList {
    /// A list whose head is `head`. The remaining slots start empty.
    pub fn new(head: ContactInfo, size: usize) -> Self {
        let mut successors = vec![None; size.max(1)];
        successors[0] = Some(head);
        Self { successors }
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContactInfo> {
        self.successors.get(index).and_then(|x| x.as_ref())
    }

    /// The authoritative immediate successor.
    pub fn head(&self) -> Option<&ContactInfo> {
        self.get(0)
    }

    /// Set slot `index` and report whether the stored id changed.
    pub fn set(&mut self, index: usize, contact: Option<ContactInfo>) -> Result<bool> {
        let size = self.len();
        let slot = self
            .successors
            .get_mut(index)
            .ok_or(Error::SuccessorIndexOutOfRange { index, size })?;
        let changed = slot.as_ref().map(|c| c.id) != contact.as_ref().map(|c| c.id);
        *slot = contact;
        Ok(changed)
    }

    /// Non empty slots, in order.
    pub fn list(&self) -> Vec<ContactInfo> {
        self.successors.iter().flatten().cloned().collect()
    }
}
