//! A peer served over TCP, from start to shutdown.
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use ringlet_core::inspect::RingInspect;
use ringlet_core::message::MessageHandler;
use ringlet_core::peer::Peer;
use ringlet_core::peer::PeerBuilder;
use ringlet_core::peer::PeerConfig;
use ringlet_transport::TcpServer;
use ringlet_transport::TcpTransport;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;

/// A bound server and the peer it answers for.
pub struct Node {
    peer: Arc<Peer>,
    server: TcpServer,
    bootstrap: Vec<String>,
}

impl Node {
    /// Bind `bind_addr` and build the peer. Nothing is served until [Node::run].
    pub async fn new(config: Config) -> Result<Self> {
        let server = TcpServer::bind(config.bind_addr.as_str()).await?;
        let local_addr = server.local_addr()?;
        let identity = config.identity(&local_addr.to_string())?;
        let bootstrap = config.bootstrap.clone();
        let peer_config = PeerConfig::try_from(config)?;

        let peer = PeerBuilder::new(identity, Arc::new(TcpTransport::new()))
            .config(peer_config)
            .build()?;
        tracing::info!("node {} bound to {}", peer.identity(), local_addr);

        Ok(Self {
            peer: Arc::new(peer),
            server,
            bootstrap,
        })
    }

    pub fn peer(&self) -> Arc<Peer> {
        self.peer.clone()
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.local_addr()?)
    }

    /// Serve, maintain the ring and join through the bootstrap peers until `shutdown` resolves.
    ///
    /// The bootstrap peers are tried in order and the first one answering is used. When
    /// none answers the node keeps running as a ring of its own. Returns the topology as
    /// it was when the node stopped.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<RingInspect> {
        let token = CancellationToken::new();
        let handler = MessageHandler::new(self.peer.clone());
        let server = tokio::spawn(self.server.serve(handler, token.clone()));

        if let Err(e) = self.peer.start() {
            token.cancel();
            let _ = server.await;
            return Err(e.into());
        }
        if !self.bootstrap.is_empty() {
            if let Err(e) = join(&self.peer, &self.bootstrap).await {
                tracing::error!("{}, running alone", e);
            }
        }

        shutdown.await;
        tracing::info!("shutting down");
        self.peer.shutdown().await;
        token.cancel();
        if let Err(e) = server.await {
            tracing::error!("server task failed: {}", e);
        }
        Ok(self.peer.inspect())
    }
}

/// Connect through the first bootstrap address that answers.
pub async fn join(peer: &Peer, bootstrap: &[String]) -> Result<()> {
    for address in bootstrap {
        match peer.connect(address).await {
            Ok(_) => return Ok(()),
            Err(e) => tracing::warn!("cannot join through {}: {}", address, e),
        }
    }
    Err(Error::BootstrapFailed)
}
