//! Tunables of a [super::Peer].
use std::time::Duration;

use crate::consts::*;
use crate::error::Error;
use crate::error::Result;
use crate::ticker::Backoff;

/// Sizes, call timeout and maintenance schedules of a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerConfig {
    /// Number of finger table slots, at most one per id bit.
    pub finger_count: usize,
    /// Length of the successor list.
    pub successor_list_size: usize,
    /// Bound of every outbound call, `None` waits forever.
    pub call_timeout: Option<Duration>,
    pub stabilize: Backoff,
    pub fix_fingers: Backoff,
    pub check_predecessor: Backoff,
    /// Delay before the first run of each maintenance task.
    pub first_tick: Duration,
}

impl Default for PeerConfig {
    fn default() -> Self {
        let gear_down = Duration::from_millis(GEAR_DOWN_PERIOD_MS);
        Self {
            finger_count: FINGER_COUNT,
            successor_list_size: SUCCESSOR_LIST_SIZE,
            call_timeout: Some(Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS)),
            stabilize: Backoff::new(
                Duration::from_millis(STABILIZE_INTERVAL_START_MS),
                Duration::from_millis(STABILIZE_INTERVAL_END_MS),
                gear_down,
            ),
            fix_fingers: Backoff::new(
                Duration::from_millis(FIX_FINGERS_INTERVAL_START_MS),
                Duration::from_millis(FIX_FINGERS_INTERVAL_END_MS),
                gear_down,
            ),
            check_predecessor: Backoff::constant(Duration::from_millis(
                CHECK_PREDECESSOR_INTERVAL_MS,
            )),
            first_tick: Duration::from_millis(FIRST_TICK_MS),
        }
    }
}

impl PeerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.finger_count == 0 || self.finger_count > MAX_FINGER_COUNT {
            return Err(Error::InvalidConfig(format!(
                "finger_count must be in 1..={}, got {}",
                MAX_FINGER_COUNT, self.finger_count
            )));
        }
        if self.successor_list_size == 0 {
            return Err(Error::InvalidConfig(
                "successor_list_size must be positive".to_string(),
            ));
        }
        if self.call_timeout == Some(Duration::ZERO) {
            return Err(Error::InvalidConfig(
                "call_timeout must be positive".to_string(),
            ));
        }
        for (name, backoff) in [
            ("stabilize", &self.stabilize),
            ("fix_fingers", &self.fix_fingers),
            ("check_predecessor", &self.check_predecessor),
        ] {
            if backoff.min.is_zero() || backoff.min > backoff.max {
                return Err(Error::InvalidConfig(format!(
                    "{} interval must satisfy 0 < min <= max, got {:?}..{:?}",
                    name, backoff.min, backoff.max
                )));
            }
        }
        Ok(())
    }
}
