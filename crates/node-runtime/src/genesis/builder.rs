//! # Genesis Builder

use al_01_ledger_state::{keys, KeyValueStore, StateError, StateView};
use al_06_commit::{CommitError, Committer, ReceiptStore};
use serde::{Deserialize, Serialize};
use shared_types::{codec, sha256, Address, Asset, Block, CodecError, Hash, Rules, NATIVE_ASSET};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Genesis errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Invalid genesis description.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),

    #[error("Genesis allocations overflow the native supply")]
    SupplyOverflow,

    #[error("Failed to read genesis state: {0}")]
    State(#[from] StateError),

    #[error("Failed to commit genesis block: {0}")]
    Commit(#[from] CommitError),

    #[error("Genesis encoding failed: {0}")]
    Codec(#[from] CodecError),

    #[error("Stored last accepted block {0} is missing")]
    MissingBlock(String),
}

/// An initial native balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Hex-encoded 32-byte address.
    pub address: String,
    pub balance: u64,
}

impl Allocation {
    pub fn parse_address(&self) -> Result<Address, GenesisError> {
        let bytes = hex::decode(self.address.trim_start_matches("0x"))
            .map_err(|e| GenesisError::InvalidConfig(format!("address {}: {}", self.address, e)))?;
        bytes.try_into().map_err(|_| {
            GenesisError::InvalidConfig(format!("address {} is not 32 bytes", self.address))
        })
    }
}

/// Chain parameters and initial allocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Genesis {
    /// Native asset symbol, stored as its metadata.
    pub symbol: String,
    pub base_units: u64,
    pub min_unit_price: u64,
    pub validity_window_secs: i64,
    pub max_block_txs: usize,
    pub max_block_units: u64,
    pub custom_allocation: Vec<Allocation>,
}

impl Default for Genesis {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            symbol: "AL".to_string(),
            base_units: rules.base_units,
            min_unit_price: rules.min_unit_price,
            validity_window_secs: rules.validity_window_secs,
            max_block_txs: rules.max_block_txs,
            max_block_units: rules.max_block_units,
            custom_allocation: Vec::new(),
        }
    }
}

impl Genesis {
    pub fn from_json(bytes: &[u8]) -> Result<Self, GenesisError> {
        let genesis: Self =
            serde_json::from_slice(bytes).map_err(|e| GenesisError::InvalidConfig(e.to_string()))?;
        genesis.validate()?;
        Ok(genesis)
    }

    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.symbol.len() > shared_types::MAX_METADATA_SIZE {
            return Err(GenesisError::InvalidConfig("symbol too long".into()));
        }
        if self.validity_window_secs <= 0 {
            return Err(GenesisError::InvalidConfig(
                "validity_window_secs must be positive".into(),
            ));
        }
        if self.max_block_txs == 0 || self.max_block_units == 0 {
            return Err(GenesisError::InvalidConfig("block limits must be positive".into()));
        }
        for allocation in &self.custom_allocation {
            allocation.parse_address()?;
        }
        self.total_supply().map(|_| ())
    }

    /// SHA-256 of the canonical genesis encoding.
    pub fn chain_id(&self) -> Result<Hash, GenesisError> {
        Ok(sha256(&codec::encode(self)?))
    }

    pub fn rules(&self) -> Result<Rules, GenesisError> {
        Ok(Rules {
            chain_id: self.chain_id()?,
            base_units: self.base_units,
            min_unit_price: self.min_unit_price,
            validity_window_secs: self.validity_window_secs,
            max_block_txs: self.max_block_txs,
            max_block_units: self.max_block_units,
        })
    }

    fn total_supply(&self) -> Result<u64, GenesisError> {
        self.custom_allocation
            .iter()
            .try_fold(0u64, |sum, a| sum.checked_add(a.balance))
            .ok_or(GenesisError::SupplyOverflow)
    }
}

/// Returns the last accepted block, writing the genesis state first when the
/// store is empty.
pub fn initialize(
    genesis: &Genesis,
    store: &Arc<dyn KeyValueStore>,
    committer: &Committer,
) -> Result<Block, GenesisError> {
    if let Some(id) = ReceiptStore::new(Arc::clone(store)).last_accepted()? {
        let bytes = store
            .get(&keys::block_key(&id))?
            .ok_or_else(|| GenesisError::MissingBlock(hex::encode(id)))?;
        let block = Block::from_bytes(&bytes)?;
        info!(height = block.height, "Reopened existing chain");
        return Ok(block);
    }

    genesis.validate()?;
    let mut view = StateView::new(Arc::clone(store));
    view.put_asset(
        &NATIVE_ASSET,
        &Asset {
            metadata: genesis.symbol.as_bytes().to_vec(),
            supply: genesis.total_supply()?,
            owner: [0u8; 32],
        },
    )?;
    for allocation in &genesis.custom_allocation {
        view.add_balance(&allocation.parse_address()?, &NATIVE_ASSET, allocation.balance)?;
    }

    let block = Block::genesis();
    let id = block.id()?;
    committer.commit(&id, &block, &view.into_change_set())?;
    info!(
        symbol = %genesis.symbol,
        allocations = genesis.custom_allocation.len(),
        "Genesis state written"
    );
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_01_ledger_state::{check_supply_invariant, MemoryStore, StateReader};
    use al_06_commit::CommitMetrics;
    use ledger_telemetry::Registry;
    use shared_bus::InMemoryEventBus;

    fn committer(store: &Arc<dyn KeyValueStore>) -> Committer {
        Committer::new(
            Arc::clone(store),
            Arc::new(InMemoryEventBus::new()),
            CommitMetrics::register(&Registry::new()).unwrap(),
        )
    }

    fn funded(balances: &[(u8, u64)]) -> Genesis {
        Genesis {
            custom_allocation: balances
                .iter()
                .map(|(b, balance)| Allocation {
                    address: hex::encode([*b; 32]),
                    balance: *balance,
                })
                .collect(),
            ..Genesis::default()
        }
    }

    // ===== CONFIG TESTS =====

    #[test]
    fn test_json_defaults() {
        let genesis = Genesis::from_json(br#"{"symbol": "TOK"}"#).unwrap();
        assert_eq!(genesis.symbol, "TOK");
        assert_eq!(genesis.base_units, 400);
        assert_eq!(genesis.max_block_units, 1_800_000);
        assert!(genesis.custom_allocation.is_empty());
    }

    #[test]
    fn test_bad_address_rejected() {
        let json = br#"{"custom_allocation": [{"address": "abcd", "balance": 5}]}"#;
        assert!(matches!(
            Genesis::from_json(json),
            Err(GenesisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_supply_overflow_rejected() {
        let genesis = funded(&[(1, u64::MAX), (2, 1)]);
        assert!(matches!(genesis.validate(), Err(GenesisError::SupplyOverflow)));
    }

    #[test]
    fn test_chain_id_depends_on_content() {
        let a = Genesis::default();
        let b = Genesis {
            symbol: "OTHER".into(),
            ..Genesis::default()
        };
        assert_eq!(a.chain_id().unwrap(), Genesis::default().chain_id().unwrap());
        assert_ne!(a.chain_id().unwrap(), b.chain_id().unwrap());
        assert_eq!(a.rules().unwrap().chain_id, a.chain_id().unwrap());
    }

    // ===== INITIALIZATION TESTS =====

    #[test]
    fn test_initialize_writes_state() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let genesis = funded(&[(1, 700), (2, 300)]);

        let block = initialize(&genesis, &store, &committer(&store)).unwrap();
        assert_eq!(block, Block::genesis());

        let native = store.get_asset(&NATIVE_ASSET).unwrap().unwrap();
        assert_eq!(native.supply, 1000);
        assert_eq!(native.owner, [0u8; 32]);
        assert_eq!(native.metadata, b"AL".to_vec());
        assert_eq!(store.get_balance(&[1u8; 32], &NATIVE_ASSET).unwrap(), 700);
        assert_eq!(store.get_balance(&[2u8; 32], &NATIVE_ASSET).unwrap(), 300);
        assert!(check_supply_invariant(store.as_ref()).unwrap().is_empty());

        let receipts = ReceiptStore::new(Arc::clone(&store));
        assert_eq!(receipts.last_accepted().unwrap(), Some(block.id().unwrap()));
        assert_eq!(receipts.block_id_at(0).unwrap(), Some(block.id().unwrap()));
    }

    #[test]
    fn test_initialize_reopens() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let genesis = funded(&[(1, 50)]);
        initialize(&genesis, &store, &committer(&store)).unwrap();

        // A different allocation must not be applied over existing state.
        let block = initialize(&funded(&[(1, 999)]), &store, &committer(&store)).unwrap();
        assert_eq!(block.height, 0);
        assert_eq!(store.get_balance(&[1u8; 32], &NATIVE_ASSET).unwrap(), 50);
    }
}
