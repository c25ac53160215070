//! Error of ringlet_core

use std::time::Duration;

use crate::dht::NodeId;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in ringlet-core.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Invalid hexadecimal node id: {0}")]
    InvalidNodeIdHex(#[from] hex::FromHexError),

    #[error("Node id must be {expected} bytes at most, got {actual}")]
    InvalidNodeIdLength { expected: usize, actual: usize },

    #[error("Request argument `{0}` must not be empty")]
    MissingArgument(&'static str),

    #[error("Request for {expected} delivered to {actual}")]
    ReceiverMismatch { expected: NodeId, actual: NodeId },

    #[error("Failed to reach {address}: {reason}")]
    Transport { address: String, reason: String },

    #[error("Call to {address} timed out after {timeout:?}")]
    CallTimeout { address: String, timeout: Duration },

    #[error("Remote peer {address} failed: {reason}")]
    RemoteFailure { address: String, reason: String },

    #[error("Unexpected report from {address}, expected {expected}")]
    UnexpectedReport {
        address: String,
        expected: &'static str,
    },

    #[error("No entry in the successor list answered")]
    NoReachableSuccessor,

    #[error("Finger index {index} out of range, table size is {size}")]
    FingerIndexOutOfRange { index: usize, size: usize },

    #[error("Successor index {index} out of range, list size is {size}")]
    SuccessorIndexOutOfRange { index: usize, size: usize },

    #[error("Ring state lock poisoned")]
    LockPoisoned,

    #[error("Ticker {0} is already started")]
    TickerAlreadyStarted(&'static str),

    #[error("Invalid peer config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns `true` if the error means the remote side could not be used,
    /// including answers that do not fit the protocol.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. }
                | Error::CallTimeout { .. }
                | Error::RemoteFailure { .. }
                | Error::UnexpectedReport { .. }
                | Error::NoReachableSuccessor
        )
    }
}
