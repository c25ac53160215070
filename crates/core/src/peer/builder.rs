#![warn(missing_docs)]
//! This module provider [PeerBuilder] and it's interface for
//! [Peer]

use std::sync::Arc;

use crate::dht::ContactInfo;
use crate::dht::PeerRing;
use crate::error::Result;
use crate::peer::Peer;
use crate::peer::PeerConfig;
use crate::ticker::Ticker;
use crate::transport::Transport;

/// Creates a PeerBuilder to configure a Peer.
pub struct PeerBuilder {
    identity: ContactInfo,
    transport: Arc<dyn Transport>,
    config: PeerConfig,
    span: Option<tracing::Span>,
}

impl PeerBuilder {
    /// Creates new instance of [PeerBuilder]
    pub fn new(identity: ContactInfo, transport: Arc<dyn Transport>) -> Self {
        PeerBuilder {
            identity,
            transport,
            config: PeerConfig::default(),
            span: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: PeerConfig) -> Self {
        self.config = config;
        self
    }

    /// Span that maintenance tasks and inbound requests are recorded in.
    /// Defaults to an `info` span named `peer` carrying the local id.
    pub fn span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Try build for `Peer`. Nothing runs until [Peer::start].
    pub fn build(self) -> Result<Peer> {
        self.config.validate()?;

        let span = self
            .span
            .unwrap_or_else(|| tracing::info_span!("peer", id = %self.identity.id));

        let dht = Arc::new(PeerRing::new(
            self.identity,
            self.config.finger_count,
            self.config.successor_list_size,
            self.transport,
            self.config.call_timeout,
        ));

        Ok(Peer {
            dht,
            config: self.config,
            span,
            stabilizer: Ticker::new("stabilize"),
            finger_fixer: Ticker::new("fix_fingers"),
            predecessor_checker: Ticker::new("check_predecessor"),
        })
    }
}
