//! Constant variables.

/// Length of a node id in bytes. The ring has 2^(8 * ID_LENGTH) positions.
pub const ID_LENGTH: usize = 20;
/// Number of bits of a node id.
pub const ID_BITS: usize = ID_LENGTH * 8;

/// Default number of fingers, covering offsets 2^0..2^9.
pub const FINGER_COUNT: usize = 10;
/// Upper bound of the finger table size, one finger per id bit.
pub const MAX_FINGER_COUNT: usize = ID_BITS;
/// Default length of the successor list.
pub const SUCCESSOR_LIST_SIZE: usize = 5;

/// After this long without topology change, maintenance runs at its slowest pace.
pub const GEAR_DOWN_PERIOD_MS: u64 = 60 * 1000;
pub const STABILIZE_INTERVAL_START_MS: u64 = 1000;
pub const STABILIZE_INTERVAL_END_MS: u64 = 5 * 60 * 1000;
pub const FIX_FINGERS_INTERVAL_START_MS: u64 = 1000;
pub const FIX_FINGERS_INTERVAL_END_MS: u64 = 5 * 60 * 1000;
pub const CHECK_PREDECESSOR_INTERVAL_MS: u64 = 20 * 1000;
/// Delay before the first run of every maintenance task.
pub const FIRST_TICK_MS: u64 = 1000;

/// Default bound of a single outbound call.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 10 * 1000;
