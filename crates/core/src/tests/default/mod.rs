use std::sync::Arc;

use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::peer::Peer;
use crate::peer::PeerBuilder;
use crate::peer::PeerConfig;
use crate::transport::dummy::DummyNetwork;

mod test_lookup;
mod test_stabilization;

pub fn contact(id: u32) -> ContactInfo {
    ContactInfo::new(format!("peer-{}", id), NodeId::from(id))
}

pub fn prepare_peer(
    network: &Arc<DummyNetwork>,
    identity: ContactInfo,
    config: PeerConfig,
) -> Arc<Peer> {
    let peer = Arc::new(
        PeerBuilder::new(identity, network.transport())
            .config(config)
            .build()
            .unwrap(),
    );
    network.register(peer.clone());
    peer
}

/// Peers with the given small ids, not joined to each other.
pub fn prepare_peers(network: &Arc<DummyNetwork>, ids: &[u32]) -> Vec<Arc<Peer>> {
    ids.iter()
        .map(|id| prepare_peer(network, contact(*id), PeerConfig::default()))
        .collect()
}

/// One stabilization round on every peer, errors ignored as the tickers would.
pub async fn stabilize_all(peers: &[Arc<Peer>]) {
    for peer in peers {
        let _ = peer.dht().stabilize().await;
    }
}

pub async fn fix_all_fingers(peers: &[Arc<Peer>]) {
    for peer in peers {
        for _ in 0..peer.config().finger_count {
            let _ = peer.dht().fix_fingers().await;
        }
    }
}

/// The first id at or after `id` going clockwise.
pub fn expected_successor(ids: &[NodeId], id: NodeId) -> NodeId {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted
        .iter()
        .find(|x| **x >= id)
        .copied()
        .unwrap_or(sorted[0])
}

/// The last id strictly before `id` going clockwise.
pub fn expected_predecessor(ids: &[NodeId], id: NodeId) -> NodeId {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted
        .iter()
        .rev()
        .find(|x| **x < id)
        .copied()
        .unwrap_or(sorted[sorted.len() - 1])
}

/// Every peer agrees with its neighbours.
pub fn is_converged(peers: &[Arc<Peer>]) -> bool {
    let ids: Vec<NodeId> = peers.iter().map(|p| p.id()).collect();
    peers.iter().all(|p| {
        let dht = p.dht();
        let successor = dht.successor().unwrap().id;
        let predecessor = dht.predecessor().unwrap().map(|c| c.id);
        successor == expected_successor(&ids, p.id() + NodeId::from(1))
            && predecessor == Some(expected_predecessor(&ids, p.id()))
    })
}

/// Join every peer through the first one and stabilize until the ring is correct.
pub async fn build_ring(peers: &[Arc<Peer>]) {
    let bootstrap = peers[0].identity().address.clone();
    for (i, peer) in peers.iter().enumerate().skip(1) {
        peer.connect(&bootstrap).await.unwrap();
        for _ in 0..3 {
            stabilize_all(&peers[..=i]).await;
        }
    }
    for _ in 0..50 {
        if is_converged(peers) {
            // refill the successor lists from the final successors
            stabilize_all(peers).await;
            return;
        }
        stabilize_all(peers).await;
    }
    panic!("ring did not converge");
}
