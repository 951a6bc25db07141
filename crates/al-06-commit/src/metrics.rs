//! Commit metrics.

use ledger_telemetry::{register_counter, register_gauge, IntCounter, IntGauge, Registry, TelemetryError};
use shared_types::ActionKind;

/// Counters of successfully executed actions, plus the accepted height.
#[derive(Clone)]
pub struct CommitMetrics {
    pub create_asset: IntCounter,
    pub mint_asset: IntCounter,
    pub transfer: IntCounter,
    pub accepted_height: IntGauge,
}

impl CommitMetrics {
    pub fn register(registry: &Registry) -> Result<Self, TelemetryError> {
        Ok(Self {
            create_asset: register_counter(registry, "al_create_asset_total", "Successful asset creations")?,
            mint_asset: register_counter(registry, "al_mint_asset_total", "Successful mints")?,
            transfer: register_counter(registry, "al_transfer_total", "Successful transfers")?,
            accepted_height: register_gauge(registry, "al_accepted_height", "Height of the last accepted block")?,
        })
    }

    pub fn counter(&self, kind: ActionKind) -> &IntCounter {
        match kind {
            ActionKind::CreateAsset => &self.create_asset,
            ActionKind::MintAsset => &self.mint_asset,
            ActionKind::Transfer => &self.transfer,
        }
    }
}
