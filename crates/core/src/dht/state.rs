//! Mutable topology of one peer.
use std::time::Duration;

use tokio::time::Instant;

use crate::dht::ContactInfo;
use crate::dht::FingerTable;
use crate::dht::SuccessorList;
use crate::error::Result;

/// Finger table, successor list, predecessor and the moment any of them last changed.
///
/// Every setter compares ids and only touches the dirty timestamp on a real change,
/// so the maintenance backoff keeps growing while the ring is quiet.
#[derive(Debug, Clone)]
pub struct RingState {
    finger: FingerTable,
    successors: SuccessorList,
    predecessor: Option<ContactInfo>,
    last_dirty: Instant,
}

impl RingState {
    /// Fresh unjoined state: the peer is its own successor and knows no predecessor.
    pub fn new(local: ContactInfo, finger_count: usize, successor_list_size: usize) -> Self {
        Self {
            finger: FingerTable::new(finger_count),
            successors: SuccessorList::new(local, successor_list_size),
            predecessor: None,
            last_dirty: Instant::now(),
        }
    }

    pub fn finger(&self) -> &FingerTable {
        &self.finger
    }

    pub fn successors(&self) -> &SuccessorList {
        &self.successors
    }

    pub fn predecessor(&self) -> Option<&ContactInfo> {
        self.predecessor.as_ref()
    }

    pub fn set_finger(&mut self, index: usize, contact: Option<ContactInfo>) -> Result<bool> {
        let changed = self.finger.set(index, contact)?;
        self.touch(changed);
        Ok(changed)
    }

    pub fn set_successor(&mut self, index: usize, contact: Option<ContactInfo>) -> Result<bool> {
        let changed = self.successors.set(index, contact)?;
        self.touch(changed);
        Ok(changed)
    }

    pub fn set_predecessor(&mut self, contact: Option<ContactInfo>) -> bool {
        let changed = self.predecessor.as_ref().map(|c| c.id) != contact.as_ref().map(|c| c.id);
        self.predecessor = contact;
        self.touch(changed);
        changed
    }

    /// Return the finger slot to fix now and move the cursor on.
    pub fn next_finger_index(&mut self) -> usize {
        let index = self.finger.next_index();
        self.finger.advance();
        index
    }

    /// Time since the last topology change.
    pub fn since_change(&self) -> Duration {
        self.last_dirty.elapsed()
    }

    fn touch(&mut self, changed: bool) {
        if changed {
            self.last_dirty = Instant::now();
        }
    }
}
