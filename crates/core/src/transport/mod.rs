//! The remote call capability the ring protocol is written against.
use async_trait::async_trait;

use crate::error::Result;
use crate::message::MessagePayload;
use crate::message::Report;

#[cfg(any(test, feature = "dummy"))]
pub mod dummy;

/// Deliver one request to the peer listening on `address` and wait for its answer.
///
/// Implementations report every delivery problem as [crate::error::Error::Transport].
/// Bounding the call in time is done by the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, address: &str, payload: MessagePayload) -> Result<Report>;
}
