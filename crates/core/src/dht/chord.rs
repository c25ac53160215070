//! Chord algorithm implement.
#![warn(missing_docs)]
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::dht::RingState;
use crate::error::Error;
use crate::error::Result;
use crate::transport::Transport;

/// PeerRing is used to help a node interact with other nodes.
/// All nodes in the network form a clockwise ring in the order of [NodeId].
/// This struct takes its name from that.
///
/// The whole mutable topology lives in one [RingState] behind one mutex.
/// The lock is only held for short synchronous sections, never across a remote call.
pub struct PeerRing {
    /// The identity of current node.
    pub local: ContactInfo,
    state: Mutex<RingState>,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) call_timeout: Option<Duration>,
}

impl PeerRing {
    /// Create a new unjoined ring: the local node is its own successor.
    pub fn new(
        local: ContactInfo,
        finger_count: usize,
        successor_list_size: usize,
        transport: Arc<dyn Transport>,
        call_timeout: Option<Duration>,
    ) -> Self {
        let state = RingState::new(local.clone(), finger_count, successor_list_size);
        Self {
            local,
            state: Mutex::new(state),
            transport,
            call_timeout,
        }
    }

    /// Id of the local node.
    pub fn id(&self) -> NodeId {
        self.local.id
    }

    /// Lock and return MutexGuard of the ring state.
    pub fn lock_state(&self) -> Result<MutexGuard<RingState>> {
        self.state.lock().map_err(|_| Error::LockPoisoned)
    }

    /// The immediate successor. Falls back to the local identity when slot 0 is empty.
    pub fn successor(&self) -> Result<ContactInfo> {
        let state = self.lock_state()?;
        Ok(state
            .successors()
            .head()
            .cloned()
            .unwrap_or_else(|| self.local.clone()))
    }

    /// Current predecessor, if any.
    pub fn predecessor(&self) -> Result<Option<ContactInfo>> {
        Ok(self.lock_state()?.predecessor().cloned())
    }

    /// Time since the topology last changed.
    pub fn since_change(&self) -> Result<Duration> {
        Ok(self.lock_state()?.since_change())
    }

    /// Scan the finger table from the highest slot down and return the first finger
    /// whose id lies in (local, id). If none qualifies the local node is the closest
    /// preceding node it knows.
    pub fn closest_preceding_node(&self, id: NodeId) -> Result<ContactInfo> {
        let state = self.lock_state()?;
        Ok(state
            .finger()
            .closest_preceding(self.id(), id)
            .cloned()
            .unwrap_or_else(|| self.local.clone()))
    }

    /// Find the peer responsible for `id`.
    ///
    /// If `id` lies in (local, successor] the successor is the answer. Otherwise the
    /// successor is asked for its closest preceding node of `id`, which is then asked
    /// for the successor of `id`. A failing successor triggers one refresh of the
    /// successor list and one retry. Errors of the delegated lookup are propagated.
    pub async fn find_successor(&self, id: NodeId) -> Result<ContactInfo> {
        let successor = self.successor()?;
        if id.between(self.id(), successor.id) {
            return Ok(successor);
        }

        let closest = match self.remote_closest_preceding_node(&successor, id).await {
            Ok(closest) => closest,
            Err(e) => {
                tracing::warn!(
                    "successor {} failed on closest preceding node: {}, refresh successor list",
                    successor,
                    e
                );
                self.update_successor_list().await?;
                let successor = self.successor()?;
                self.remote_closest_preceding_node(&successor, id).await?
            }
        };
        self.remote_find_successor(&closest, id).await
    }

    /// Handle a notification of `sender`, which believes it may be our predecessor.
    ///
    /// The sender is adopted when no predecessor is known or when it lies strictly
    /// between the current predecessor and the local node. Returns whether it was adopted.
    pub fn notify(&self, sender: ContactInfo) -> Result<bool> {
        let mut state = self.lock_state()?;
        let adopt = match state.predecessor() {
            None => true,
            Some(predecessor) => sender.id.between_open(predecessor.id, self.id()),
        };
        if !adopt {
            return Ok(false);
        }
        tracing::debug!("notified by {}, set as predecessor", sender);
        state.set_predecessor(Some(sender));
        Ok(true)
    }

    /// Responsibility check: true iff `id` lies in (predecessor, local].
    /// Without a predecessor the local node is responsible for every id.
    pub fn is_responsible_for(&self, id: NodeId) -> Result<bool> {
        Ok(match self.predecessor()? {
            None => true,
            Some(predecessor) => id.between(predecessor.id, self.id()),
        })
    }
}
