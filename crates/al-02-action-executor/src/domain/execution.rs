//! # Transaction Execution
//!
//! Charges the fee, then applies the action.
//!
//! ```text
//! units = base_units + action_units
//! fee   = units × unit_price        (burned from the signer's native balance)
//! ```
//!
//! A transaction whose fee cannot be paid is not executable and produces
//! no result. Once the fee is paid, exactly one result is produced and the
//! fee stays charged even if the action fails.

use al_01_ledger_state::{StateReader, StateView};
use shared_types::{ExecutionResult, Rules, Transaction, NATIVE_ASSET};
use tracing::debug;

use crate::domain::actions::{apply, AuthContext};
use crate::errors::{ActionError, ExecutionError};

/// Fee charged for `tx` under `rules`.
pub fn fee_for(tx: &Transaction, rules: &Rules) -> Result<(u64, u64), ExecutionError> {
    let units = rules.units(tx.action());
    let unit_price = tx.base().unit_price;
    let fee = units
        .checked_mul(unit_price)
        .ok_or(ExecutionError::FeeOverflow { units, unit_price })?;
    Ok((units, fee))
}

/// Burns `fee` native units from `payer`. Leaves the view unchanged on error.
fn charge_fee(view: &mut StateView, payer: &shared_types::Address, fee: u64) -> Result<(), ExecutionError> {
    if fee == 0 {
        return Ok(());
    }
    let available = view.get_balance(payer, &NATIVE_ASSET)?;
    if available < fee {
        return Err(ExecutionError::InsufficientFee { fee, available });
    }
    let mut native = view
        .get_asset(&NATIVE_ASSET)?
        .ok_or(ExecutionError::NativeAssetMissing)?;
    // Sum of balances never exceeds supply, so this cannot underflow when
    // the invariant holds.
    native.supply = native.supply.saturating_sub(fee);
    view.put_balance(payer, &NATIVE_ASSET, available - fee);
    view.put_asset(&NATIVE_ASSET, &native)?;
    Ok(())
}

/// Executes one transaction against `view`.
pub fn execute_transaction(
    tx: &Transaction,
    rules: &Rules,
    view: &mut StateView,
) -> Result<ExecutionResult, ExecutionError> {
    let (units, fee) = fee_for(tx, rules)?;
    let ctx = AuthContext {
        tx_id: tx.id(),
        signer: tx.sender(),
    };

    let checkpoint = view.checkpoint();
    if let Err(e) = charge_fee(view, &ctx.signer, fee) {
        view.revert_to(checkpoint);
        return Err(e);
    }

    match apply(tx.action(), &ctx, view) {
        Ok(()) => {
            debug!(tx = %hex::encode(ctx.tx_id), kind = tx.action().kind().as_str(), units, "Action succeeded");
            Ok(ExecutionResult::success(units))
        }
        Err(ActionError::State(e)) => {
            view.revert_to(checkpoint);
            Err(ExecutionError::State(e))
        }
        Err(e) => {
            debug!(tx = %hex::encode(ctx.tx_id), kind = tx.action().kind().as_str(), error = %e, "Action failed");
            Ok(ExecutionResult::failure(units, e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use al_01_ledger_state::{check_supply_invariant, KeyValueStore, MemoryStore, WriteBatch};
    use proptest::prelude::*;
    use shared_types::{Action, Asset, Base, KeyPair};
    use std::sync::Arc;

    const CHAIN: [u8; 32] = [5u8; 32];

    fn rules() -> Rules {
        Rules {
            chain_id: CHAIN,
            ..Rules::default()
        }
    }

    fn genesis(store: &Arc<dyn KeyValueStore>, funded: &[(&KeyPair, u64)]) {
        let mut view = StateView::new(store.clone());
        let supply = funded.iter().map(|(_, b)| *b).sum();
        view.put_asset(
            &NATIVE_ASSET,
            &Asset {
                metadata: b"AL".to_vec(),
                supply,
                owner: [0u8; 32],
            },
        )
        .unwrap();
        for (key, balance) in funded {
            view.put_balance(&key.address(), &NATIVE_ASSET, *balance);
        }
        let mut batch = WriteBatch::new();
        view.into_change_set().write_to(&mut batch);
        store.write_batch(batch).unwrap();
    }

    fn sign(key: &KeyPair, action: Action, unit_price: u64) -> Transaction {
        key.sign_transaction(
            Base {
                chain_id: CHAIN,
                timestamp: 0,
                unit_price,
            },
            action,
        )
        .unwrap()
    }

    #[test]
    fn test_fee_is_burned() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let alice = KeyPair::generate();
        genesis(&store, &[(&alice, 10_000)]);

        let mut view = StateView::new(store);
        let tx = sign(&alice, Action::CreateAsset { metadata: vec![] }, 1);
        let result = execute_transaction(&tx, &rules(), &mut view).unwrap();

        assert!(result.success);
        assert_eq!(result.units, 432);
        assert_eq!(view.get_balance(&alice.address(), &NATIVE_ASSET).unwrap(), 10_000 - 432);
        assert_eq!(view.get_asset(&NATIVE_ASSET).unwrap().unwrap().supply, 10_000 - 432);
    }

    #[test]
    fn test_failed_action_keeps_fee() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let alice = KeyPair::generate();
        genesis(&store, &[(&alice, 1_000)]);

        let mut view = StateView::new(store);
        let overdraw = Action::Transfer {
            to: [3u8; 32],
            asset: NATIVE_ASSET,
            value: 900,
        };
        let result = execute_transaction(&sign(&alice, overdraw, 1), &rules(), &mut view).unwrap();

        assert!(!result.success);
        assert_eq!(result.output_str(), "insufficient balance");
        assert_eq!(result.units, 472);
        assert_eq!(view.get_balance(&alice.address(), &NATIVE_ASSET).unwrap(), 528);
        assert_eq!(view.get_balance(&[3u8; 32], &NATIVE_ASSET).unwrap(), 0);
    }

    #[test]
    fn test_unpayable_fee_is_not_executable() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let alice = KeyPair::generate();
        genesis(&store, &[(&alice, 100)]);

        let mut view = StateView::new(store);
        let tx = sign(&alice, Action::CreateAsset { metadata: vec![] }, 1);
        let err = execute_transaction(&tx, &rules(), &mut view).unwrap_err();

        assert_eq!(err, ExecutionError::InsufficientFee { fee: 432, available: 100 });
        assert!(err.is_fee_error());
        assert_eq!(view.pending_writes(), 0);
    }

    #[test]
    fn test_fee_overflow() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let alice = KeyPair::generate();
        genesis(&store, &[(&alice, 100)]);

        let mut view = StateView::new(store);
        let tx = sign(&alice, Action::CreateAsset { metadata: vec![] }, u64::MAX);
        assert!(matches!(
            execute_transaction(&tx, &rules(), &mut view),
            Err(ExecutionError::FeeOverflow { .. })
        ));
    }

    #[test]
    fn test_execution_is_deterministic() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let alice = KeyPair::generate();
        genesis(&store, &[(&alice, 100_000)]);
        let txs: Vec<_> = (0..5)
            .map(|i| {
                sign(
                    &alice,
                    Action::Transfer {
                        to: [i as u8; 32],
                        asset: NATIVE_ASSET,
                        value: 10_000 * i,
                    },
                    1,
                )
            })
            .collect();

        let run = || {
            let mut view = StateView::new(store.clone());
            txs.iter()
                .map(|tx| execute_transaction(tx, &rules(), &mut view).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    fn arb_action(assets: usize) -> impl Strategy<Value = (usize, u8, u8, u64)> {
        (0..assets + 2, 0u8..3, 0u8..3, 0u64..50_000)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_supply_invariant_holds(ops in proptest::collection::vec(arb_action(2), 1..40)) {
            let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
            let keys = [KeyPair::from_seed([1u8; 32]), KeyPair::from_seed([2u8; 32]), KeyPair::from_seed([3u8; 32])];
            genesis(&store, &[(&keys[0], 200_000), (&keys[1], 200_000), (&keys[2], 200_000)]);

            let mut view = StateView::new(store.clone());
            let mut created = vec![NATIVE_ASSET];
            for (choice, signer, to, value) in ops {
                let signer = &keys[signer as usize];
                let to = keys[to as usize].address();
                let asset = created[choice % created.len()];
                let action = match choice % 3 {
                    0 => Action::CreateAsset { metadata: vec![choice as u8] },
                    1 => Action::MintAsset { to, asset, value },
                    _ => Action::Transfer { to, asset, value },
                };
                let tx = sign(signer, action, 1);
                if let Ok(result) = execute_transaction(&tx, &rules(), &mut view) {
                    if result.success && matches!(tx.action(), Action::CreateAsset { .. }) {
                        created.push(tx.id());
                    }
                }
            }

            let mut batch = WriteBatch::new();
            view.into_change_set().write_to(&mut batch);
            store.write_batch(batch).unwrap();
            prop_assert!(check_supply_invariant(store.as_ref()).unwrap().is_empty());
        }
    }
}
