use std::time::Duration;

use crate::dht::NodeId;
use crate::error::Error;
use crate::error::Result;
use crate::peer::PeerConfig;
use crate::ticker::Backoff;
use crate::tests::default::build_ring;
use crate::tests::default::contact;
use crate::tests::default::is_converged;
use crate::tests::default::prepare_peer;
use crate::tests::default::prepare_peers;
use crate::tests::default::stabilize_all;
use crate::tests::setup_tracing;
use crate::transport::dummy::DummyNetwork;

#[tokio::test]
async fn test_two_peers_converge() -> Result<()> {
    let network = DummyNetwork::with_random_delay();
    let peers = prepare_peers(&network, &[10, 50]);
    let (p1, p2) = (&peers[0], &peers[1]);

    // only 50 knows about 10
    assert_eq!(p2.connect("peer-10").await?, contact(10));
    assert_eq!(p1.dht().successor()?, contact(10));
    assert_eq!(p1.dht().predecessor()?, None);

    let mut rounds = 0;
    while !is_converged(&peers) {
        assert!(rounds < 3, "not converged after {} rounds", rounds);
        stabilize_all(&peers).await;
        rounds += 1;
    }

    assert_eq!(p1.dht().successor()?, contact(50));
    assert_eq!(p1.dht().predecessor()?, Some(contact(50)));
    assert_eq!(p2.dht().successor()?, contact(10));
    assert_eq!(p2.dht().predecessor()?, Some(contact(10)));
    Ok(())
}

#[tokio::test]
async fn test_lone_peer_is_its_own_ring() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10]);
    stabilize_all(&peers).await;

    let dht = peers[0].dht();
    assert_eq!(dht.successor()?, contact(10));
    assert_eq!(dht.predecessor()?, Some(contact(10)));
    assert_eq!(
        dht.lock_state()?.successors().list(),
        vec![contact(10); PeerConfig::default().successor_list_size]
    );
    Ok(())
}

#[tokio::test]
async fn test_successor_list_follows_the_ring() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 20, 30, 40]);
    build_ring(&peers).await;

    let list = peers[0].dht().lock_state()?.successors().list();
    let ids: Vec<NodeId> = list.iter().map(|c| c.id).collect();
    assert_eq!(
        ids,
        [20u32, 30, 40, 10, 20].map(NodeId::from).to_vec()
    );
    Ok(())
}

#[tokio::test]
async fn test_successor_list_self_heals() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 20, 30, 40]);
    build_ring(&peers).await;

    network.set_offline("peer-20", true);
    peers[0].dht().update_successor_list().await?;
    assert_eq!(peers[0].dht().successor()?, contact(30));

    // 30 and 40 going offline as well leaves only the peer itself
    network.set_offline("peer-30", true);
    network.set_offline("peer-40", true);
    peers[0].dht().update_successor_list().await?;
    assert_eq!(peers[0].dht().successor()?, contact(10));

    // the list with nothing reachable reports it
    network.set_offline("peer-10", true);
    assert!(matches!(
        peers[0].dht().update_successor_list().await,
        Err(Error::NoReachableSuccessor)
    ));
    Ok(())
}

#[tokio::test]
async fn test_ring_repairs_after_failure() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 20, 30, 40]);
    build_ring(&peers).await;

    network.set_offline("peer-20", true);
    let alive = vec![peers[0].clone(), peers[2].clone(), peers[3].clone()];
    for _ in 0..3 {
        for peer in alive.iter() {
            peer.dht().check_predecessor().await?;
        }
        stabilize_all(&alive).await;
    }
    assert!(is_converged(&alive));
    Ok(())
}

#[tokio::test]
async fn test_check_predecessor() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 50]);
    build_ring(&peers).await;

    let dht = peers[0].dht();
    dht.check_predecessor().await?;
    assert_eq!(dht.predecessor()?, Some(contact(50)));

    network.set_offline("peer-50", true);
    tokio::time::pause();
    let before = dht.since_change()?;
    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(dht.since_change()? > before);

    dht.check_predecessor().await?;
    assert_eq!(dht.predecessor()?, None);
    assert_eq!(dht.since_change()?, Duration::ZERO);

    // a cleared predecessor is replaced by the next notify
    assert!(dht.notify(contact(30))?);
    Ok(())
}

#[tokio::test]
async fn test_unchanged_round_keeps_dirty_time() -> Result<()> {
    let network = DummyNetwork::new();
    let peers = prepare_peers(&network, &[10, 30, 50]);
    build_ring(&peers).await;

    tokio::time::pause();
    tokio::time::advance(Duration::from_secs(30)).await;
    stabilize_all(&peers).await;
    for peer in peers.iter() {
        assert!(peer.dht().since_change()? >= Duration::from_secs(30));
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_notify_pokes_maintenance() -> Result<()> {
    let network = DummyNetwork::new();
    let slow = Backoff::constant(Duration::from_secs(1000));
    let config = PeerConfig {
        stabilize: slow,
        fix_fingers: slow,
        check_predecessor: slow,
        first_tick: Duration::from_secs(1000),
        ..Default::default()
    };
    let p1 = prepare_peer(&network, contact(10), config.clone());
    let p2 = prepare_peer(&network, contact(50), config);
    p1.start()?;

    p2.connect("peer-10").await?;
    // 10 adopts 50 as predecessor and is woken to stabilize right away
    p2.dht().stabilize().await?;
    assert_eq!(p1.dht().predecessor()?, Some(contact(50)));

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(p1.dht().successor()?, contact(50));
    assert_eq!(p2.dht().predecessor()?, Some(contact(10)));

    p1.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_started_peers_converge_on_their_own() -> Result<()> {
    setup_tracing();
    let network = DummyNetwork::with_random_delay();
    let peers = prepare_peers(&network, &[10, 20, 30, 40, 50]);
    for peer in peers.iter() {
        peer.start()?;
    }
    for peer in peers.iter().skip(1) {
        peer.connect("peer-10").await?;
    }

    let mut waited = 0;
    while !is_converged(&peers) {
        assert!(waited < 1200, "not converged after {}s", waited);
        tokio::time::sleep(Duration::from_secs(10)).await;
        waited += 10;
    }

    for peer in peers.iter() {
        peer.shutdown().await;
    }
    Ok(())
}
