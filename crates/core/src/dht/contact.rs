//! Descriptor of a reachable peer.
use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::dht::NodeId;

/// Where and who a peer is. Values are never mutated once created, and "no contact"
/// is always spelled `Option::<ContactInfo>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Network location the transport dials, e.g. `127.0.0.1:5600`.
    pub address: String,
    /// Position of the peer on the ring.
    pub id: NodeId,
    /// Opaque application bytes advertised with the identity.
    #[serde(default)]
    pub payload: Bytes,
}

impl ContactInfo {
    pub fn new(address: impl Into<String>, id: NodeId) -> Self {
        Self {
            address: address.into(),
            id,
            payload: Bytes::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }
}

impl std::fmt::Display for ContactInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.address)
    }
}
