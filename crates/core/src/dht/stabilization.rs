//! Maintenance routines keeping the ring correct.
//!
//! Each routine is one round. The rounds are scheduled by the peer, see
//! [crate::ticker::Ticker]. A failing remote peer never aborts more than the
//! current round.

use crate::dht::PeerRing;
use crate::error::Error;
use crate::error::Result;

impl PeerRing {
    /// Rebuild the successor list from the first entry that answers a ping.
    ///
    /// That entry becomes slot 0, with whatever address or payload it now reports.
    /// Every following slot is the successor of the slot before it, or a copy of the
    /// slot before it when that peer cannot be reached.
    pub async fn update_successor_list(&self) -> Result<()> {
        let candidates = { self.lock_state()?.successors().list() };

        let mut head = None;
        for candidate in candidates {
            match self.remote_ping(&candidate.address).await {
                Ok(identity) => {
                    head = Some(identity);
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        "unresponsive successor {}: {}, trying the next one",
                        candidate,
                        e
                    );
                }
            }
        }
        let head = head.ok_or(Error::NoReachableSuccessor)?;

        let size = { self.lock_state()?.successors().len() };
        let mut entries = Vec::with_capacity(size);
        entries.push(head);
        for i in 1..size {
            let prev = &entries[i - 1];
            let next = match self.remote_successor(prev).await {
                Ok(next) => next,
                Err(e) => {
                    tracing::debug!("cannot read successor of {}: {}", prev, e);
                    prev.clone()
                }
            };
            entries.push(next);
        }

        let mut state = self.lock_state()?;
        for (i, entry) in entries.into_iter().enumerate() {
            state.set_successor(i, Some(entry))?;
        }
        Ok(())
    }

    /// One stabilization round.
    ///
    /// The successor list is refreshed first. Then the successor is asked for its
    /// predecessor `x`. If `x` is the local node nothing changed. If `x` lies strictly
    /// between the local node and the successor, `x` becomes the new successor.
    /// Finally the successor is notified of the local node.
    pub async fn stabilize(&self) -> Result<()> {
        if let Err(e) = self.update_successor_list().await {
            tracing::error!("[stabilize] Failed on update successor list {}", e);
        }

        let successor = self.successor()?;
        let x = match self.remote_predecessor(&successor).await {
            Ok(x) => x,
            Err(e) => {
                tracing::error!("[stabilize] Failed on query predecessor of {}: {}", successor, e);
                None
            }
        };

        if let Some(x) = x {
            if x.id == self.id() {
                return Ok(());
            }
            if x.id.between_open(self.id(), successor.id) {
                tracing::info!("[stabilize] new successor {}", x);
                self.lock_state()?.set_successor(0, Some(x))?;
            }
        }

        let successor = self.successor()?;
        self.remote_notify(&successor).await
    }

    /// Refresh one finger, round robin. Returns the slot that was worked on.
    ///
    /// A failed lookup leaves the slot untouched until the cursor comes back to it.
    pub async fn fix_fingers(&self) -> Result<usize> {
        let index = { self.lock_state()?.next_finger_index() };
        let start = self.id().finger_start(index);
        let successor = self.find_successor(start).await?;
        if self.lock_state()?.set_finger(index, Some(successor))? {
            tracing::debug!("[fix_fingers] finger {} changed", index);
        }
        Ok(index)
    }

    /// Ping the predecessor and forget it if it does not answer.
    pub async fn check_predecessor(&self) -> Result<()> {
        let Some(predecessor) = self.predecessor()? else {
            return Ok(());
        };
        if let Err(e) = self.remote_ping(&predecessor.address).await {
            tracing::warn!("connection to predecessor {} has been lost: {}", predecessor, e);
            let mut state = self.lock_state()?;
            // a notify may have replaced it meanwhile
            if state.predecessor().map(|p| p.id) == Some(predecessor.id) {
                state.set_predecessor(None);
            }
        }
        Ok(())
    }
}
