//! Ringlet: a Chord ring peer.
//! --------------
//! - [NodeId](crate::dht::NodeId) is a 160 bit identifier with modular ring arithmetic.
//! - [PeerRing](crate::dht::PeerRing) holds the finger table, successor list and predecessor
//!   of a peer, and runs lookup and maintenance rounds against an abstract [Transport](crate::transport::Transport).
//! - [Ticker](crate::ticker::Ticker) schedules maintenance, slowing down while the ring is stable.
//! - [Peer](crate::peer::Peer) ties them together and answers inbound requests.
//!
//! # Joining
//!
//! 1. A new peer pings the bootstrap address to learn who lives there.
//! 2. It asks the bootstrap peer for the successor of its own id, and installs the answer as its successor.
//! 3. Stabilization does the rest: the successor learns about its new predecessor through notify,
//!    the old predecessor learns about its new successor through stabilize, and fix fingers fills
//!    the finger table one slot per round.
//!
//! # Maintenance
//!
//! Stabilize and fix fingers run every second right after a topology change, and ease towards
//! every five minutes once nothing has changed for a minute. A notify that changes the predecessor
//! wakes both right away. Check predecessor runs every twenty seconds.
//!
//! # Simulation
//! ```shell
//! cargo test -p ringlet-core --features dummy
//! ```
pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod message;
pub mod peer;
pub mod ticker;
pub mod transport;

#[cfg(test)]
mod tests;
