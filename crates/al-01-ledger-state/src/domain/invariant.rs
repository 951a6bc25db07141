use std::collections::BTreeMap;

use shared_types::codec::{self, MAX_TRANSACTION_SIZE};
use shared_types::{Asset, AssetId};
use tracing::warn;

use crate::domain::keys::{parse_asset_key, parse_balance_key, ASSET_PREFIX, BALANCE_PREFIX};
use crate::domain::StateError;
use crate::ports::reader::decode_balance;
use crate::ports::KeyValueStore;

/// An asset whose recorded supply differs from the sum of its balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyMismatch {
    pub asset: AssetId,
    pub supply: u64,
    pub balances: u128,
}

/// Checks that every asset's supply equals the sum of its balances.
///
/// Returns the offending assets; an empty vector means the invariant holds.
/// Balances of unknown assets are reported with a supply of zero.
pub fn check_supply_invariant(store: &dyn KeyValueStore) -> Result<Vec<SupplyMismatch>, StateError> {
    let mut totals: BTreeMap<AssetId, u128> = BTreeMap::new();
    for (key, value) in store.iter_prefix(&[BALANCE_PREFIX])? {
        let (_, asset) = parse_balance_key(&key).ok_or_else(|| StateError::corrupt(&key, "bad balance key"))?;
        let balance = decode_balance(&key, &value)?;
        *totals.entry(asset).or_default() += u128::from(balance);
    }

    let mut mismatches = Vec::new();
    for (key, value) in store.iter_prefix(&[ASSET_PREFIX])? {
        let id = parse_asset_key(&key).ok_or_else(|| StateError::corrupt(&key, "bad asset key"))?;
        let asset: Asset = codec::decode(&value, MAX_TRANSACTION_SIZE)?;
        let balances = totals.remove(&id).unwrap_or(0);
        if balances != u128::from(asset.supply) {
            mismatches.push(SupplyMismatch {
                asset: id,
                supply: asset.supply,
                balances,
            });
        }
    }
    mismatches.extend(totals.into_iter().map(|(asset, balances)| SupplyMismatch {
        asset,
        supply: 0,
        balances,
    }));
    for m in &mismatches {
        warn!(
            asset = %hex::encode(&m.asset[..8]),
            supply = m.supply,
            balances = %m.balances,
            "Supply invariant violated"
        );
    }
    Ok(mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::StateView;
    use crate::ports::WriteBatch;
    use proptest::prelude::*;
    use std::sync::Arc;

    const COIN: AssetId = [7u8; 32];

    fn commit(store: &Arc<dyn KeyValueStore>, view: StateView) {
        let mut batch = WriteBatch::new();
        view.into_change_set().write_to(&mut batch);
        store.write_batch(batch).unwrap();
    }

    fn asset(supply: u64) -> Asset {
        Asset {
            metadata: Vec::new(),
            supply,
            owner: [1u8; 32],
        }
    }

    #[test]
    fn test_balanced_state_passes() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut view = StateView::new(store.clone());
        view.put_asset(&COIN, &asset(15)).unwrap();
        view.put_balance(&[1u8; 32], &COIN, 10);
        view.put_balance(&[2u8; 32], &COIN, 5);
        commit(&store, view);
        assert!(check_supply_invariant(store.as_ref()).unwrap().is_empty());
    }

    #[test]
    fn test_mismatch_reported() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut view = StateView::new(store.clone());
        view.put_asset(&COIN, &asset(15)).unwrap();
        view.put_balance(&[1u8; 32], &COIN, 10);
        view.put_balance(&[3u8; 32], &[8u8; 32], 1);
        commit(&store, view);

        let mismatches = check_supply_invariant(store.as_ref()).unwrap();
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0].asset, COIN);
        assert_eq!(mismatches[0].balances, 10);
        assert_eq!(mismatches[1].supply, 0);
    }

    proptest! {
        #[test]
        fn prop_moving_balances_preserves_supply(
            amounts in proptest::collection::vec(0u64..1_000_000, 1..8),
            moves in proptest::collection::vec((0usize..8, 0usize..8, 0u64..2_000_000), 0..32),
        ) {
            let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
            let mut view = StateView::new(store.clone());
            let supply: u64 = amounts.iter().sum();
            view.put_asset(&COIN, &asset(supply)).unwrap();
            for (i, amount) in amounts.iter().enumerate() {
                view.put_balance(&[i as u8; 32], &COIN, *amount);
            }
            for (from, to, value) in moves {
                let from = [(from % amounts.len()) as u8; 32];
                let to = [(to % amounts.len()) as u8; 32];
                let cp = view.checkpoint();
                let moved = view
                    .sub_balance(&from, &COIN, value)
                    .and_then(|_| view.add_balance(&to, &COIN, value));
                if moved.is_err() {
                    view.revert_to(cp);
                }
            }
            commit(&store, view);
            prop_assert!(check_supply_invariant(store.as_ref()).unwrap().is_empty());
        }
    }
}
