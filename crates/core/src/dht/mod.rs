#![warn(missing_docs)]
//! Implementation of the ring
//! which is based on CHORD, ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of nodes that must be contacted to find a successor in an N-node network is O(log N).

mod chord;
/// Contact information of a peer
pub mod contact;
pub mod did;
/// Finger table of the ring
pub mod finger;
mod remote;
mod stabilization;
/// Mutable topology of a peer
pub mod state;
/// Successor list of the ring
pub mod successor;

pub use chord::PeerRing;
pub use contact::ContactInfo;
pub use did::NodeId;
pub use finger::FingerTable;
pub use state::RingState;
pub use successor::SuccessorList;
