//! Metrics for the block lifecycle

use ledger_telemetry::{
    register_counter, register_gauge, register_histogram, Histogram, IntCounter, IntGauge,
    Registry, TelemetryError,
};

#[derive(Clone)]
pub struct LifecycleMetrics {
    pub blocks_built: IntCounter,
    pub blocks_accepted: IntCounter,
    pub blocks_rejected: IntCounter,
    pub verify_failures: IntCounter,
    /// Blocks currently processing.
    pub processing: IntGauge,
    pub verify_duration: Histogram,
}

impl LifecycleMetrics {
    pub fn register(registry: &Registry) -> Result<Self, TelemetryError> {
        Ok(Self {
            blocks_built: register_counter(registry, "al_blocks_built_total", "Blocks built locally")?,
            blocks_accepted: register_counter(registry, "al_blocks_accepted_total", "Blocks accepted")?,
            blocks_rejected: register_counter(registry, "al_blocks_rejected_total", "Blocks rejected")?,
            verify_failures: register_counter(
                registry,
                "al_block_verify_failures_total",
                "Blocks that failed verification",
            )?,
            processing: register_gauge(registry, "al_processing_blocks", "Blocks awaiting a decision")?,
            verify_duration: register_histogram(
                registry,
                "al_block_verify_seconds",
                "Time spent verifying a block",
            )?,
        })
    }
}
