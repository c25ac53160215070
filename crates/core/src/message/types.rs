#![warn(missing_docs)]
//! This module defines the messages peers of the ring exchange.
//! Every message is a request answered by exactly one [Report].

use serde::Deserialize;
use serde::Serialize;

use crate::dht::ContactInfo;
use crate::dht::NodeId;

/// Ask a raw address who lives there.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PingSend;

/// MessageType use to find successor in a chord ring.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FindSuccessorSend {
    /// id of target, a request without it is rejected
    pub id: Option<NodeId>,
}

/// MessageType use to ask the receiver which finger it knows right before the target.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClosestPrecedingNodeSend {
    /// id of target, a request without it is rejected
    pub id: Option<NodeId>,
}

/// MessageType use to read the predecessor of the receiver.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct QueryPredecessorSend;

/// MessageType use to read the immediate successor of the receiver.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct QuerySuccessorSend;

/// MessageType use to tell the receiver that the sender may be its predecessor.
/// The candidate is the sender of the envelope.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NotifyPredecessorSend;

/// A collection of all requests.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Message {
    /// Ping
    PingSend(PingSend),
    /// FindSuccessor
    FindSuccessorSend(FindSuccessorSend),
    /// ClosestPrecedingNode
    ClosestPrecedingNodeSend(ClosestPrecedingNodeSend),
    /// Predecessor
    QueryPredecessorSend(QueryPredecessorSend),
    /// Successor
    QuerySuccessorSend(QuerySuccessorSend),
    /// Notify
    NotifyPredecessorSend(NotifyPredecessorSend),
}

impl Message {
    /// Name of the request, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Message::PingSend(_) => "Ping",
            Message::FindSuccessorSend(_) => "FindSuccessor",
            Message::ClosestPrecedingNodeSend(_) => "ClosestPrecedingNode",
            Message::QueryPredecessorSend(_) => "Predecessor",
            Message::QuerySuccessorSend(_) => "Successor",
            Message::NotifyPredecessorSend(_) => "Notify",
        }
    }
}

/// Answer to a [Message].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub enum Report {
    /// A contact, for Ping, FindSuccessor, ClosestPrecedingNode and Successor.
    Contact(ContactInfo),
    /// A nullable contact, for Predecessor.
    MaybeContact(Option<ContactInfo>),
    /// Acknowledgement, for Notify.
    Ack,
    /// The receiver rejected or failed the request.
    Failure(String),
}
