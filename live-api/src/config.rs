//! Configuration for [`LiveClient`](crate::LiveClient)
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!     "bridge": { "send_addr": "192.168.1.20:9000" },
//!     "max_concurrent_reads": 16,
//!     "read_timeout_ms": 2000,
//!     "parameter_lookup": "requested_track"
//! }
//! ```

use bridge_client::BridgeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::{ApiError, Result};

/// Which track device parameters are read from when listing devices
///
/// Earlier versions of this client always read parameters from the master
/// track's devices, whatever track had been asked for. `MasterTrack` keeps
/// that behaviour for callers that depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterLookup {
    /// Parameters come from the devices of the track that was listed
    #[default]
    RequestedTrack,
    /// Parameters always come from `live_set master_track devices <n>`
    MasterTrack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Socket addresses of the bridge
    pub bridge: BridgeConfig,

    /// Maximum number of bridge reads in flight at once
    /// Default: 64
    pub max_concurrent_reads: usize,

    /// Time allowed for each read before it fails; `None` waits forever
    /// Default: 5 seconds
    #[serde(rename = "read_timeout_ms", with = "duration_ms")]
    pub read_timeout: Option<Duration>,

    /// Default: `RequestedTrack`
    pub parameter_lookup: ParameterLookup,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            max_concurrent_reads: 64,
            read_timeout: Some(Duration::from_secs(5)),
            parameter_lookup: ParameterLookup::RequestedTrack,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave like the original JavaScript client: no effective fan-out
    /// limit, no timeouts, parameters read from the master track
    pub fn legacy() -> Self {
        Self {
            max_concurrent_reads: Semaphore::MAX_PERMITS,
            read_timeout: None,
            parameter_lookup: ParameterLookup::MasterTrack,
            ..Default::default()
        }
    }

    /// Parse a JSON config document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ApiError::Configuration(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ApiError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_reads == 0 {
            return Err(ApiError::Configuration(
                "Max concurrent reads must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrent_reads > Semaphore::MAX_PERMITS {
            return Err(ApiError::Configuration(format!(
                "Max concurrent reads must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }

        if self.read_timeout == Some(Duration::ZERO) {
            return Err(ApiError::Configuration(
                "Read timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_bridge(mut self, bridge: BridgeConfig) -> Self {
        self.bridge = bridge;
        self
    }

    pub fn with_max_concurrent_reads(mut self, limit: usize) -> Self {
        self.max_concurrent_reads = limit;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_parameter_lookup(mut self, lookup: ParameterLookup) -> Self {
        self.parameter_lookup = lookup;
        self
    }
}

/// `Option<Duration>` as an optional number of milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(|d| d.as_millis() as u64)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
