//! An in-memory network for tests and simulation.
use std::sync::Arc;
use std::sync::Weak;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::DashSet;
use rand::Rng;

use crate::error::Error;
use crate::error::Result;
use crate::message::MessageHandler;
use crate::message::MessagePayload;
use crate::message::Report;
use crate::message::RingService;
use crate::transport::Transport;

/// Max delay in ms on delivering a request
const DUMMY_DELAY_MAX: u64 = 10;

/// Addresses and the services listening on them.
///
/// Services are held weakly, dropping the last `Arc` of a peer takes it off the network.
#[derive(Default)]
pub struct DummyNetwork {
    services: DashMap<String, Weak<dyn RingService>>,
    offline: DashSet<String>,
    random_delay: bool,
}

impl DummyNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Like [DummyNetwork::new], but every delivery sleeps for a random short while.
    pub fn with_random_delay() -> Arc<Self> {
        Arc::new(Self {
            random_delay: true,
            ..Default::default()
        })
    }

    /// Serve `service` on its identity address.
    pub fn register(&self, service: Arc<dyn RingService>) {
        let address = service.identity().address;
        self.services.insert(address, Arc::downgrade(&service));
    }

    /// Make `address` unreachable, or reachable again.
    pub fn set_offline(&self, address: &str, offline: bool) {
        if offline {
            self.offline.insert(address.to_string());
        } else {
            self.offline.remove(address);
        }
    }

    /// A transport sending into this network.
    pub fn transport(self: &Arc<Self>) -> Arc<DummyTransport> {
        Arc::new(DummyTransport {
            network: self.clone(),
        })
    }

    fn lookup(&self, address: &str) -> Result<Arc<dyn RingService>> {
        let unreachable = |reason: &str| Error::Transport {
            address: address.to_string(),
            reason: reason.to_string(),
        };
        if self.offline.contains(address) {
            return Err(unreachable("offline"));
        }
        self.services
            .get(address)
            .and_then(|s| s.value().upgrade())
            .ok_or_else(|| unreachable("connection refused"))
    }
}

/// [Transport] over a [DummyNetwork].
pub struct DummyTransport {
    network: Arc<DummyNetwork>,
}

#[async_trait]
impl Transport for DummyTransport {
    async fn send(&self, address: &str, payload: MessagePayload) -> Result<Report> {
        if self.network.random_delay {
            let ms = rand::thread_rng().gen_range(0..=DUMMY_DELAY_MAX);
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        let service = self.network.lookup(address)?;
        Ok(MessageHandler::new(service).handle_payload(&payload).await)
    }
}
