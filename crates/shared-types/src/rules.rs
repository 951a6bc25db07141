//! # Execution Rules
//!
//! Chain parameters every node must agree on, plus the unit schedule.

use serde::{Deserialize, Serialize};

use crate::entities::{Action, Hash};

/// Maximum size of asset metadata in bytes.
pub const MAX_METADATA_SIZE: usize = 256;

/// Units charged for a transfer on top of the base units.
pub const TRANSFER_UNITS: u64 = 72;

/// Units charged for a mint on top of the base units.
pub const MINT_ASSET_UNITS: u64 = 72;

/// Fixed units charged for asset creation, plus one per metadata byte.
pub const CREATE_ASSET_UNITS: u64 = 32;

/// Maximum seconds a block timestamp may run ahead of the local clock.
pub const MAX_FUTURE_SKEW_SECS: i64 = 10;

/// Parameters derived from genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub chain_id: Hash,
    /// Units charged for every transaction.
    pub base_units: u64,
    pub min_unit_price: u64,
    /// Seconds a transaction stays valid on either side of its timestamp.
    pub validity_window_secs: i64,
    pub max_block_txs: usize,
    pub max_block_units: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            chain_id: [0u8; 32],
            base_units: 400,
            min_unit_price: 1,
            validity_window_secs: 60,
            max_block_txs: 1000,
            max_block_units: 1_800_000,
        }
    }
}

impl Rules {
    /// Units consumed by executing `action`.
    pub fn units(&self, action: &Action) -> u64 {
        let action_units = match action {
            Action::Transfer { .. } => TRANSFER_UNITS,
            Action::MintAsset { .. } => MINT_ASSET_UNITS,
            Action::CreateAsset { metadata } => {
                CREATE_ASSET_UNITS.saturating_add(metadata.len() as u64)
            }
        };
        self.base_units.saturating_add(action_units)
    }

    /// Whether a transaction timestamp is outside the window at `now`.
    pub fn is_expired(&self, timestamp: i64, now: i64) -> bool {
        timestamp.saturating_add(self.validity_window_secs) < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NATIVE_ASSET;

    #[test]
    fn test_unit_schedule() {
        let rules = Rules::default();
        let transfer = Action::Transfer {
            to: [1u8; 32],
            asset: NATIVE_ASSET,
            value: 1,
        };
        assert_eq!(rules.units(&transfer), 472);
        let create = Action::CreateAsset {
            metadata: b"hello".to_vec(),
        };
        assert_eq!(rules.units(&create), 437);
    }

    #[test]
    fn test_expiry() {
        let rules = Rules::default();
        assert!(!rules.is_expired(100, 160));
        assert!(rules.is_expired(100, 161));
    }
}
