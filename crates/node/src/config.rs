//! The YAML configuration file of a node.
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use ringlet_core::consts::*;
use ringlet_core::dht::ContactInfo;
use ringlet_core::dht::NodeId;
use ringlet_core::peer::PeerConfig;
use ringlet_core::ticker::Backoff;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

pub const DEFAULT_CONFIG_LOCATION: &str = "~/.ringlet/config.yaml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:50000";

/// Bounds of an adaptive maintenance interval, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IntervalConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl IntervalConfig {
    fn backoff(&self, gear_down: Duration) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
            gear_down,
        )
    }
}

fn default_finger_count() -> usize {
    FINGER_COUNT
}

fn default_successor_list_size() -> usize {
    SUCCESSOR_LIST_SIZE
}

fn default_call_timeout_ms() -> Option<u64> {
    Some(DEFAULT_CALL_TIMEOUT_MS)
}

fn default_gear_down_secs() -> u64 {
    GEAR_DOWN_PERIOD_MS / 1000
}

fn default_stabilize() -> IntervalConfig {
    IntervalConfig {
        min_ms: STABILIZE_INTERVAL_START_MS,
        max_ms: STABILIZE_INTERVAL_END_MS,
    }
}

fn default_fix_fingers() -> IntervalConfig {
    IntervalConfig {
        min_ms: FIX_FINGERS_INTERVAL_START_MS,
        max_ms: FIX_FINGERS_INTERVAL_END_MS,
    }
}

fn default_check_predecessor_ms() -> u64 {
    CHECK_PREDECESSOR_INTERVAL_MS
}

fn default_first_tick_ms() -> u64 {
    FIRST_TICK_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Address the server listens on.
    pub bind_addr: String,
    /// Address other peers reach this node at, when it differs from `bind_addr`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_addr: Option<String>,
    /// A 40 character hex id, or a seed hashed into one.
    /// Without it the id is derived from the advertised address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Peers to join through, tried in order.
    #[serde(default)]
    pub bootstrap: Vec<String>,
    /// Opaque payload published along with the contact.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub payload: String,
    #[serde(default = "default_finger_count")]
    pub finger_count: usize,
    #[serde(default = "default_successor_list_size")]
    pub successor_list_size: usize,
    /// `null` lets remote calls wait forever.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: Option<u64>,
    #[serde(default = "default_gear_down_secs")]
    pub gear_down_secs: u64,
    #[serde(default = "default_stabilize")]
    pub stabilize: IntervalConfig,
    #[serde(default = "default_fix_fingers")]
    pub fix_fingers: IntervalConfig,
    #[serde(default = "default_check_predecessor_ms")]
    pub check_predecessor_ms: u64,
    #[serde(default = "default_first_tick_ms")]
    pub first_tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            external_addr: None,
            id: None,
            bootstrap: vec![],
            payload: String::new(),
            finger_count: default_finger_count(),
            successor_list_size: default_successor_list_size(),
            call_timeout_ms: default_call_timeout_ms(),
            gear_down_secs: default_gear_down_secs(),
            stabilize: default_stabilize(),
            fix_fingers: default_fix_fingers(),
            check_predecessor_ms: default_check_predecessor_ms(),
            first_tick_ms: default_first_tick_ms(),
        }
    }
}

impl TryFrom<Config> for PeerConfig {
    type Error = Error;
    fn try_from(config: Config) -> Result<Self> {
        let gear_down = Duration::from_secs(config.gear_down_secs);
        let peer_config = PeerConfig {
            finger_count: config.finger_count,
            successor_list_size: config.successor_list_size,
            call_timeout: config.call_timeout_ms.map(Duration::from_millis),
            stabilize: config.stabilize.backoff(gear_down),
            fix_fingers: config.fix_fingers.backoff(gear_down),
            check_predecessor: Backoff::constant(Duration::from_millis(
                config.check_predecessor_ms,
            )),
            first_tick: Duration::from_millis(config.first_tick_ms),
        };
        peer_config.validate()?;
        Ok(peer_config)
    }
}

impl Config {
    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self)?;
        path.to_str()
            .map(|p| p.to_owned())
            .ok_or_else(|| Error::InvalidPath(path.to_string_lossy().to_string()))
    }

    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        Ok(serde_yaml::from_reader(f_rdr)?)
    }

    /// Identity of the node once the server listens on `listen_addr`.
    ///
    /// The advertised address is `external_addr` if set, otherwise `listen_addr`.
    pub fn identity(&self, listen_addr: &str) -> Result<ContactInfo> {
        let address = self
            .external_addr
            .clone()
            .unwrap_or_else(|| listen_addr.to_string());
        let id = parse_node_id(self.id.as_deref(), &address)?;
        Ok(ContactInfo::new(address, id).with_payload(Bytes::from(self.payload.clone())))
    }
}

/// A 40 character `id` is read as hex, any other `id` is hashed as a seed.
/// Without `id` the seed is the host and port of `address` joined together.
pub fn parse_node_id(id: Option<&str>, address: &str) -> Result<NodeId> {
    match id {
        Some(id) if id.len() == 2 * ID_LENGTH => Ok(NodeId::from_str(id)?),
        Some(seed) => Ok(NodeId::from_seed(seed)),
        None => {
            let seed = match address.rsplit_once(':') {
                Some((host, port)) => format!("{}{}", host, port),
                None => address.to_string(),
            };
            Ok(NodeId::from_seed(seed))
        }
    }
}
