//! Prometheus helpers.
//!
//! Every node owns its own `Registry` so several nodes can share a process.
//! Metric names follow `al_<component>_<metric>[_total]`.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

use crate::TelemetryError;

/// Creates and registers an integer counter.
pub fn register_counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, TelemetryError> {
    let counter = IntCounter::new(name, help).map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    registry
        .register(Box::new(counter.clone()))
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    Ok(counter)
}

/// Creates and registers an integer gauge.
pub fn register_gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge, TelemetryError> {
    let gauge = IntGauge::new(name, help).map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    registry
        .register(Box::new(gauge.clone()))
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    Ok(gauge)
}

/// Creates and registers a latency histogram (seconds, exponential buckets).
pub fn register_histogram(registry: &Registry, name: &str, help: &str) -> Result<Histogram, TelemetryError> {
    let buckets = prometheus::exponential_buckets(0.0001, 2.0, 15)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    let histogram = Histogram::with_opts(HistogramOpts::new(name, help).buckets(buckets))
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    registry
        .register(Box::new(histogram.clone()))
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    Ok(histogram)
}

/// Encode all metrics of a registry in Prometheus text format.
pub fn encode_metrics(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&registry.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
