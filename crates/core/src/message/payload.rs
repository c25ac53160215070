//! Envelope of every request.
use serde::Deserialize;
use serde::Serialize;

use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::error::Error;
use crate::error::Result;
use crate::message::Message;

/// A request with its routing header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    /// Identity of the caller.
    pub sender: ContactInfo,
    /// Id the caller believes lives at the dialed address.
    /// `None` when it is not known yet, as for a Ping during join.
    pub receiver: Option<NodeId>,
    /// The request itself.
    pub message: Message,
}

impl MessagePayload {
    pub fn new(message: Message, sender: ContactInfo, receiver: Option<NodeId>) -> Self {
        Self {
            sender,
            receiver,
            message,
        }
    }

    /// Reject a payload meant for another id.
    pub fn check_receiver(&self, local: NodeId) -> Result<()> {
        match self.receiver {
            Some(expected) if expected != local => Err(Error::ReceiverMismatch {
                expected,
                actual: local,
            }),
            _ => Ok(()),
        }
    }
}
