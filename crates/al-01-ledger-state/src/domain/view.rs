//! Speculative ledger view used while building or verifying a block.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared_types::{codec, Address, Asset, AssetId};

use crate::domain::change_set::ChangeSet;
use crate::domain::keys::{asset_key, balance_key};
use crate::domain::StateError;
use crate::ports::{KeyValueStore, StateReader};

/// Position in a view's journal; see `StateView::revert_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// A transactional view over durable state.
///
/// Reads fall through the view's own writes, then the ancestor change sets
/// (newest first), then the store. Writes never reach the store; dropping
/// the view discards them.
pub struct StateView {
    base: Arc<dyn KeyValueStore>,
    /// Processing ancestors, oldest first.
    parents: Vec<Arc<ChangeSet>>,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
    /// Previous entry in `writes` for every write, in order.
    journal: Vec<(Vec<u8>, Option<Option<Vec<u8>>>)>,
}

impl StateView {
    pub fn new(base: Arc<dyn KeyValueStore>) -> Self {
        Self::with_parents(base, Vec::new())
    }

    pub fn with_parents(base: Arc<dyn KeyValueStore>, parents: Vec<Arc<ChangeSet>>) -> Self {
        Self {
            base,
            parents,
            writes: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.journal.len())
    }

    /// Undoes every write made after `checkpoint`.
    pub fn revert_to(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.0 {
            let Some((key, previous)) = self.journal.pop() else {
                break;
            };
            match previous {
                Some(value) => {
                    self.writes.insert(key, value);
                }
                None => {
                    self.writes.remove(&key);
                }
            }
        }
    }

    fn write_raw(&mut self, key: Vec<u8>, value: Option<Vec<u8>>) {
        let previous = self.writes.insert(key.clone(), value);
        self.journal.push((key, previous));
    }

    /// Sets a balance; a zero balance deletes the entry.
    pub fn put_balance(&mut self, address: &Address, asset: &AssetId, amount: u64) {
        let key = balance_key(address, asset);
        let value = (amount != 0).then(|| amount.to_be_bytes().to_vec());
        self.write_raw(key, value);
    }

    /// Credits `amount`, failing without a write on overflow.
    pub fn add_balance(&mut self, address: &Address, asset: &AssetId, amount: u64) -> Result<u64, StateError> {
        let current = self.get_balance(address, asset)?;
        let updated = current
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow { current, amount })?;
        self.put_balance(address, asset, updated);
        Ok(updated)
    }

    /// Debits `amount`, failing without a write on underflow.
    pub fn sub_balance(&mut self, address: &Address, asset: &AssetId, amount: u64) -> Result<u64, StateError> {
        let available = self.get_balance(address, asset)?;
        let updated = available
            .checked_sub(amount)
            .ok_or(StateError::InsufficientBalance {
                required: amount,
                available,
            })?;
        self.put_balance(address, asset, updated);
        Ok(updated)
    }

    pub fn put_asset(&mut self, id: &AssetId, asset: &Asset) -> Result<(), StateError> {
        let bytes = codec::encode(asset)?;
        self.write_raw(asset_key(id), Some(bytes));
        Ok(())
    }

    pub fn delete_asset(&mut self, id: &AssetId) {
        self.write_raw(asset_key(id), None);
    }

    /// Number of keys written so far.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Freezes the writes into a change set.
    pub fn into_change_set(self) -> ChangeSet {
        ChangeSet::from_writes(self.writes)
    }
}

impl StateReader for StateView {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        if let Some(value) = self.writes.get(key) {
            return Ok(value.clone());
        }
        for parent in self.parents.iter().rev() {
            if let Some(value) = parent.get(key) {
                return Ok(value.map(<[u8]>::to_vec));
            }
        }
        self.base.get(key)
    }
}
