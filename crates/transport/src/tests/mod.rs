use std::sync::Arc;

use ringlet_core::dht::ContactInfo;
use ringlet_core::dht::NodeId;
use ringlet_core::error::Error as RingError;
use ringlet_core::message::MessageHandler;
use ringlet_core::peer::Peer;
use ringlet_core::peer::PeerBuilder;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::TcpServer;
use crate::TcpTransport;

struct Running {
    peer: Arc<Peer>,
    token: CancellationToken,
    server: JoinHandle<()>,
}

impl Running {
    fn address(&self) -> String {
        self.peer.identity().address.clone()
    }

    async fn stop(self) {
        self.token.cancel();
        self.server.await.unwrap();
    }
}

async fn spawn_peer(seed: &str) -> Result<Running> {
    let server = TcpServer::bind("127.0.0.1:0").await?;
    let identity = ContactInfo::new(server.local_addr()?.to_string(), NodeId::from_seed(seed));
    let peer = Arc::new(PeerBuilder::new(identity, Arc::new(TcpTransport::new())).build()?);
    let token = CancellationToken::new();
    let server = tokio::spawn(server.serve(MessageHandler::new(peer.clone()), token.clone()));
    Ok(Running {
        peer,
        token,
        server,
    })
}

fn successor_of(ids: &[NodeId], id: NodeId) -> NodeId {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted
        .iter()
        .find(|x| **x > id)
        .copied()
        .unwrap_or(sorted[0])
}

fn is_converged(peers: &[Running]) -> bool {
    let ids: Vec<NodeId> = peers.iter().map(|r| r.peer.id()).collect();
    peers.iter().all(|r| {
        r.peer.dht().successor().unwrap().id == successor_of(&ids, r.peer.id())
    })
}

#[tokio::test]
async fn test_ping_over_tcp() -> Result<()> {
    let a = spawn_peer("a").await?;
    let b = spawn_peer("b").await?;

    let found = a.peer.dht().remote_ping(&b.address()).await?;
    assert_eq!(&found, b.peer.identity());

    a.stop().await;
    b.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_ring_over_tcp() -> Result<()> {
    let mut peers = vec![];
    for seed in ["alice", "bob", "carol", "dave"] {
        peers.push(spawn_peer(seed).await?);
    }
    let bootstrap = peers[0].address();
    for running in peers.iter().skip(1) {
        running.peer.connect(&bootstrap).await?;
    }

    let mut rounds = 0;
    while !is_converged(&peers) {
        assert!(rounds < 50, "not converged after {} rounds", rounds);
        for running in peers.iter() {
            let _ = running.peer.dht().stabilize().await;
        }
        rounds += 1;
    }

    for from in peers.iter() {
        for to in peers.iter() {
            let found = from.peer.lookup(to.peer.id()).await?;
            assert_eq!(&found, to.peer.identity());
        }
    }

    for running in peers {
        running.stop().await;
    }
    Ok(())
}

#[tokio::test]
async fn test_failure_report_crosses_the_wire() -> Result<()> {
    let a = spawn_peer("a").await?;
    let b = spawn_peer("b").await?;

    let stale = ContactInfo::new(b.address(), NodeId::from_seed("someone else"));
    let err = a.peer.dht().remote_successor(&stale).await.unwrap_err();
    assert!(matches!(err, RingError::RemoteFailure { .. }), "{:?}", err);

    a.stop().await;
    b.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_stopped_server_is_unreachable() -> Result<()> {
    let a = spawn_peer("a").await?;
    let b = spawn_peer("b").await?;
    let address = b.address();
    b.stop().await;

    let err = a.peer.dht().remote_ping(&address).await.unwrap_err();
    assert!(matches!(err, RingError::Transport { .. }), "{:?}", err);
    assert!(err.is_unreachable());

    a.stop().await;
    Ok(())
}
