//! # Node Configuration
//!
//! Every field has a default, so `{}` is a valid configuration file.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AL_LOG_LEVEL` | `log_level` |
//! | `AL_TEST_MODE` | `test_mode` |
//! | `AL_BUILD_INTERVAL_MS` | `builder.build_interval_ms` |

use al_03_mempool::MempoolConfig;
use al_04_gossip::GossipConfig;
use al_05_block_lifecycle::BuilderConfig;
use ledger_telemetry::parse_flag;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Manual gossip and build triggers instead of timers.
    pub test_mode: bool,
    pub log_level: String,
    pub mempool: MempoolConfig,
    pub builder: BuilderConfig,
    pub gossip: GossipConfig,
    pub network: NetworkConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            log_level: "info".to_string(),
            mempool: MempoolConfig::default(),
            builder: BuilderConfig::default(),
            gossip: GossipConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

/// In-process network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Capacity of each node's inbound gossip queue.
    pub inbound_queue_size: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            inbound_queue_size: 1024,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration file: {0}")]
    Parse(String),

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}

impl NodeConfig {
    /// Parses a JSON configuration.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies `AL_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(level) = lookup("AL_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(value) = lookup("AL_TEST_MODE") {
            self.test_mode = parse_flag(&value);
        }
        if let Some(value) = lookup("AL_BUILD_INTERVAL_MS") {
            self.builder.build_interval_ms = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "AL_BUILD_INTERVAL_MS",
                value: value.clone(),
            })?;
        }
        Ok(())
    }
}
