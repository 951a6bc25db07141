//! # Ledger Telemetry
//!
//! Logging and metrics plumbing for ledger nodes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AL_SERVICE_NAME` | `asset-ledger` | Service name in logs |
//! | `AL_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `AL_JSON_LOGS` | `false` | JSON output |
//! | `AL_CONSOLE_OUTPUT` | `true` | Console output |

mod config;
mod logging;
pub mod metrics;

pub use config::{parse_flag, TelemetryConfig};
pub use logging::{init_logging, init_test_logging};
pub use metrics::{
    encode_metrics, register_counter, register_gauge, register_histogram, HistogramTimer,
};
pub use prometheus::{Histogram, IntCounter, IntGauge, Registry};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
