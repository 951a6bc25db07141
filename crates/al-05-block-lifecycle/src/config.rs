//! Builder configuration.

use serde::{Deserialize, Serialize};

/// Default pause between timer-driven build signals.
pub const DEFAULT_BUILD_INTERVAL_MS: u64 = 500;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Milliseconds between timer ticks of the `TimeBuilder`.
    pub build_interval_ms: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            build_interval_ms: DEFAULT_BUILD_INTERVAL_MS,
        }
    }
}
