use std::sync::Arc;

use crate::consts::MAX_FINGER_COUNT;
use crate::dht::ContactInfo;
use crate::dht::NodeId;
use crate::error::Result;
use crate::peer::Peer;
use crate::peer::PeerConfig;
use crate::tests::default::build_ring;
use crate::tests::default::contact;
use crate::tests::default::expected_successor;
use crate::tests::default::fix_all_fingers;
use crate::tests::default::prepare_peer;
use crate::tests::default::prepare_peers;
use crate::transport::dummy::DummyNetwork;

async fn assert_lookups(peers: &[Arc<Peer>], targets: &[NodeId]) -> Result<()> {
    let ids: Vec<NodeId> = peers.iter().map(|p| p.id()).collect();
    for target in targets {
        let expected = expected_successor(&ids, *target);
        for peer in peers {
            let found = peer.lookup(*target).await?;
            assert_eq!(
                found.id,
                expected,
                "lookup of {} from {}",
                target,
                peer.id()
            );
            let owner = peers.iter().find(|p| p.id() == found.id).unwrap();
            assert!(owner.is_responsible_for(*target)?);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_lookup_on_small_ids() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 30, 50, 70, 90]);
    build_ring(&peers).await;
    fix_all_fingers(&peers).await;

    let targets: Vec<NodeId> = [0u32, 5, 10, 11, 29, 30, 31, 64, 89, 90, 91, 1000]
        .into_iter()
        .map(NodeId::from)
        .collect();
    assert_lookups(&peers, &targets).await
}

#[tokio::test]
async fn test_lookup_on_random_ids() -> Result<()> {
    let network = DummyNetwork::new();
    let config = PeerConfig {
        finger_count: MAX_FINGER_COUNT,
        ..Default::default()
    };
    let peers: Vec<Arc<Peer>> = (0..8)
        .map(|i| {
            let identity = ContactInfo::new(format!("peer-{}", i), NodeId::random());
            prepare_peer(&network, identity, config.clone())
        })
        .collect();
    build_ring(&peers).await;
    fix_all_fingers(&peers).await;

    let mut targets: Vec<NodeId> = (0..16).map(|_| NodeId::random()).collect();
    targets.extend(peers.iter().map(|p| p.id()));
    targets.push(NodeId::zero());
    assert_lookups(&peers, &targets).await
}

#[tokio::test]
async fn test_fingers_span_the_ring() -> Result<()> {
    let network = DummyNetwork::new();
    let config = PeerConfig {
        finger_count: MAX_FINGER_COUNT,
        ..Default::default()
    };
    // eight peers an eighth of the ring apart
    let mut id = NodeId::from(12345);
    let mut peers = vec![];
    for i in 0..8 {
        let identity = ContactInfo::new(format!("peer-{}", i), id);
        peers.push(prepare_peer(&network, identity, config.clone()));
        id = id + NodeId::pow2(MAX_FINGER_COUNT - 3);
    }
    build_ring(&peers).await;
    fix_all_fingers(&peers).await;

    let ids: Vec<NodeId> = peers.iter().map(|p| p.id()).collect();
    for (n, peer) in peers.iter().enumerate() {
        let dht = peer.dht();
        let state = dht.lock_state()?;
        let finger = state.finger();
        assert_eq!(finger.len(), MAX_FINGER_COUNT);
        let mut distinct = vec![];
        for i in 0..finger.len() {
            let entry = finger.get(i).unwrap().id;
            assert_eq!(
                entry,
                expected_successor(&ids, peer.id().finger_start(i)),
                "finger {} of {}",
                i,
                peer.id()
            );
            if !distinct.contains(&entry) {
                distinct.push(entry);
            }
        }
        assert!(distinct.len() >= 3, "fingers of {} collapsed", peer.id());
        // the last finger points half way round
        assert_eq!(finger.get(MAX_FINGER_COUNT - 1).unwrap().id, ids[(n + 4) % 8]);
    }
    Ok(())
}

#[tokio::test]
async fn test_fix_fingers_example() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 30, 50]);
    build_ring(&peers).await;
    fix_all_fingers(&peers).await;

    let dht = peers[0].dht();
    let state = dht.lock_state()?;
    let finger = state.finger();
    // 10 + 2^2 = 14, whose successor is 30
    assert_eq!(finger.get(2), Some(&contact(30)));
    for i in 0..=4 {
        assert_eq!(finger.get(i).unwrap().id, NodeId::from(30), "finger {}", i);
    }
    // 10 + 2^5 = 42
    assert_eq!(finger.get(5).unwrap().id, NodeId::from(50));
    // 10 + 2^6 = 74 wraps around to the local peer
    for i in 6..finger.len() {
        assert_eq!(finger.get(i).unwrap().id, NodeId::from(10), "finger {}", i);
    }
    Ok(())
}

#[tokio::test]
async fn test_closest_preceding_node_without_candidate() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 30, 50]);
    build_ring(&peers).await;
    fix_all_fingers(&peers).await;

    // fingers of 10 hold 30 and 50, none of them lies in (10, 25)
    let dht = peers[0].dht();
    assert_eq!(dht.closest_preceding_node(NodeId::from(25))?, contact(10));
    assert_eq!(dht.closest_preceding_node(NodeId::from(45))?, contact(30));
    assert_eq!(dht.closest_preceding_node(NodeId::from(5))?, contact(50));
    Ok(())
}

#[tokio::test]
async fn test_lookup_skips_dead_successor() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 20, 30, 40]);
    build_ring(&peers).await;

    network.set_offline("peer-20", true);
    // 35 is not in (10, 20], so the dead successor is asked first
    let found = peers[0].lookup(NodeId::from(35)).await?;
    assert_eq!(found.id, NodeId::from(40));
    assert_eq!(peers[0].dht().successor()?.id, NodeId::from(30));
    Ok(())
}
