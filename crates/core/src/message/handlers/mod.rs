#![warn(missing_docs)]
//! This module implemented the inbound side of the ring protocol.
//!
//! A transport hands every received [MessagePayload] to [MessageHandler::handle_payload],
//! which checks the envelope, dispatches the request to the matching [HandleMsg]
//! implementation and turns the outcome into a [Report]. Errors never escape the
//! handler, they are answered with [Report::Failure].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;

use super::MessagePayload;
use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::error::Result;
use crate::message::Message;
use crate::message::Report;

/// Handlers of FindSuccessor and ClosestPrecedingNode
pub mod dht;
/// Handlers of Ping, Predecessor, Successor and Notify
pub mod stabilization;

/// The inbound surface of a peer.
#[async_trait]
pub trait RingService: Send + Sync {
    /// Identity of the local peer, the answer to Ping.
    fn identity(&self) -> ContactInfo;
    /// The peer responsible for `id`.
    async fn find_successor(&self, id: NodeId) -> Result<ContactInfo>;
    /// The finger closest before `id`, or the local identity.
    fn closest_preceding_node(&self, id: NodeId) -> Result<ContactInfo>;
    /// Current predecessor, if any.
    fn predecessor(&self) -> Result<Option<ContactInfo>>;
    /// Current immediate successor.
    fn successor(&self) -> Result<ContactInfo>;
    /// `sender` thinks it might be our predecessor. Returns whether it was adopted.
    fn notify(&self, sender: ContactInfo) -> Result<bool>;
    /// Span inbound requests are recorded in.
    fn span(&self) -> tracing::Span {
        tracing::Span::none()
    }
}

/// MessageHandler dispatches requests to a [RingService].
#[derive(Clone)]
pub struct MessageHandler {
    service: Arc<dyn RingService>,
}

/// Generic trait for handle message ,inspired by Actor-Model.
#[async_trait]
pub trait HandleMsg<T> {
    /// Message handler.
    async fn handle(&self, ctx: &MessagePayload, msg: &T) -> Result<Report>;
}

impl MessageHandler {
    /// Create a new MessageHandler instance.
    pub fn new(service: Arc<dyn RingService>) -> Self {
        Self { service }
    }

    /// Answer one request.
    pub async fn handle_payload(&self, payload: &MessagePayload) -> Report {
        let span = self.service.span();
        async {
            tracing::debug!(
                "received {} from {}",
                payload.message.name(),
                payload.sender
            );
            match self.dispatch(payload).await {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!(
                        "rejected {} from {}: {}",
                        payload.message.name(),
                        payload.sender,
                        e
                    );
                    Report::Failure(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, payload: &MessagePayload) -> Result<Report> {
        payload.check_receiver(self.service.identity().id)?;
        match &payload.message {
            Message::PingSend(msg) => self.handle(payload, msg).await,
            Message::FindSuccessorSend(msg) => self.handle(payload, msg).await,
            Message::ClosestPrecedingNodeSend(msg) => self.handle(payload, msg).await,
            Message::QueryPredecessorSend(msg) => self.handle(payload, msg).await,
            Message::QuerySuccessorSend(msg) => self.handle(payload, msg).await,
            Message::NotifyPredecessorSend(msg) => self.handle(payload, msg).await,
        }
    }
}
