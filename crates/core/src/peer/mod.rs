//! A member of the ring.
//!
//! [Peer] owns one identity, one [PeerRing] and the three maintenance tasks working on it.
//! It answers inbound requests through [RingService] and joins a ring with [Peer::connect].
#![warn(missing_docs)]
use std::future::Future;
use std::sync::Arc;

use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::dht::PeerRing;
use crate::error::Result;
use crate::inspect::RingInspect;
use crate::ticker::Backoff;
use crate::ticker::Ticker;

mod builder;
mod config;
mod impls;

pub use builder::PeerBuilder;
pub use config::PeerConfig;

/// The peer of the ring, built by [PeerBuilder].
pub struct Peer {
    dht: Arc<PeerRing>,
    config: PeerConfig,
    span: tracing::Span,
    stabilizer: Ticker,
    finger_fixer: Ticker,
    predecessor_checker: Ticker,
}

impl Peer {
    /// Identity of the local node.
    pub fn identity(&self) -> &ContactInfo {
        &self.dht.local
    }

    /// Id of the local node.
    pub fn id(&self) -> NodeId {
        self.dht.id()
    }

    /// The ring state and protocol of this peer.
    pub fn dht(&self) -> Arc<PeerRing> {
        self.dht.clone()
    }

    /// Configuration the peer was built with.
    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    /// Spawn stabilize, fix fingers and check predecessor.
    pub fn start(&self) -> Result<()> {
        self.schedule(&self.stabilizer, self.config.stabilize, |dht| async move {
            dht.stabilize().await
        })?;
        self.schedule(&self.finger_fixer, self.config.fix_fingers, |dht| async move {
            dht.fix_fingers().await.map(|_| ())
        })?;
        self.schedule(
            &self.predecessor_checker,
            self.config.check_predecessor,
            |dht| async move { dht.check_predecessor().await },
        )?;
        tracing::info!(parent: &self.span, "peer {} started", self.identity());
        Ok(())
    }

    fn schedule<F, Fut>(&self, ticker: &Ticker, backoff: Backoff, round: F) -> Result<()>
    where
        F: Fn(Arc<PeerRing>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let dht = self.dht.clone();
        let name = ticker.name();
        ticker.start(self.config.first_tick, self.span.clone(), move || {
            let dht = dht.clone();
            let fut = round(dht.clone());
            async move {
                if let Err(e) = fut.await {
                    tracing::error!("[{}] round failed: {}", name, e);
                }
                match dht.since_change() {
                    Ok(since_change) => backoff.interval(since_change),
                    Err(_) => backoff.min,
                }
            }
        })
    }

    /// Join the ring that the peer at `address` belongs to.
    ///
    /// The bootstrap peer is pinged for its identity, then asked for the successor of the
    /// local id, which becomes the local successor. Returns that successor.
    pub async fn connect(&self, address: &str) -> Result<ContactInfo> {
        let bootstrap = self.dht.remote_ping(address).await?;
        let successor = self.dht.remote_find_successor(&bootstrap, self.id()).await?;
        self.dht
            .lock_state()?
            .set_successor(0, Some(successor.clone()))?;
        tracing::info!(
            parent: &self.span,
            "joined through {}, successor is {}",
            bootstrap,
            successor
        );
        self.poke();
        Ok(successor)
    }

    /// Wake stabilize and fix fingers now instead of at their next tick.
    pub fn poke(&self) {
        self.stabilizer.wake();
        self.finger_fixer.wake();
    }

    /// Stop the maintenance tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        futures::future::join_all([
            self.stabilizer.cancel(),
            self.finger_fixer.cancel(),
            self.predecessor_checker.cancel(),
        ])
        .await;
        tracing::info!(parent: &self.span, "peer {} stopped", self.identity());
    }

    /// Whether this peer is responsible for `id`, that is `id` lies in (predecessor, local].
    pub fn is_responsible_for(&self, id: NodeId) -> Result<bool> {
        self.dht.is_responsible_for(id)
    }

    /// Locate the peer responsible for `id`.
    pub async fn lookup(&self, id: NodeId) -> Result<ContactInfo> {
        self.dht.find_successor(id).await
    }

    /// Snapshot of the local topology.
    pub fn inspect(&self) -> RingInspect {
        RingInspect::inspect(&self.dht)
    }
}
