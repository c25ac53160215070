//! Serialisable snapshot of a peer's topology.
use serde::Deserialize;
use serde::Serialize;

use crate::dht::PeerRing;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingInspect {
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub predecessor: Option<String>,
    pub successors: Vec<String>,
    /// Runs of equal fingers as `(finger, first slot, last slot)`.
    pub finger_table: Vec<(Option<String>, u64, u64)>,
    pub since_change_ms: u64,
}

impl RingInspect {
    pub fn inspect(dht: &PeerRing) -> Self {
        let (predecessor, successors, finger_table, since_change_ms) = match dht.lock_state() {
            Ok(state) => {
                let predecessor = state.predecessor().map(|p| p.id.to_string());
                let successors = state
                    .successors()
                    .list()
                    .into_iter()
                    .map(|s| s.id.to_string())
                    .collect();
                let finger = state
                    .finger()
                    .list()
                    .iter()
                    .map(|x| x.as_ref().map(|c| c.id.to_string()));
                let since_change_ms = state.since_change().as_millis() as u64;
                (predecessor, successors, compress_iter(finger), since_change_ms)
            }
            Err(e) => {
                tracing::error!("cannot inspect ring state: {}", e);
                Default::default()
            }
        };

        Self {
            id: dht.id().to_string(),
            address: dht.local.address.clone(),
            predecessor,
            successors,
            finger_table,
            since_change_ms,
        }
    }
}

pub fn compress_iter<T>(iter: impl Iterator<Item = T>) -> Vec<(T, u64, u64)>
where T: PartialEq {
    let mut result = vec![];
    let mut start = 0u64;
    let mut count = 0u64;
    let mut prev: Option<T> = None;

    for (i, x) in iter.enumerate() {
        match prev {
            Some(p) if p == x => {
                prev = Some(p);
                count += 1;
                continue;
            }
            Some(p) => result.push((p, start, start + count - 1)),
            None => {}
        }
        start = i as u64;
        count = 1;
        prev = Some(x);
    }

    if let Some(p) = prev {
        result.push((p, start, start + count - 1));
    }

    result
}
