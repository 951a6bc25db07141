//! Read side of committed history.

use std::sync::Arc;

use al_01_ledger_state::{keys, KeyValueStore, StateError};
use al_03_mempool::CommittedTransactions;
use shared_types::{codec, BlockId, Receipt, TxId};

use crate::error::CommitError;

/// Upper bound on an encoded receipt.
const MAX_RECEIPT_SIZE: u64 = 64;

#[derive(Clone)]
pub struct ReceiptStore {
    store: Arc<dyn KeyValueStore>,
}

impl ReceiptStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Receipt of an accepted transaction.
    pub fn get_receipt(&self, tx_id: &TxId) -> Result<Option<Receipt>, CommitError> {
        match self.store.get(&keys::receipt_key(tx_id))? {
            Some(bytes) => Ok(Some(codec::decode(&bytes, MAX_RECEIPT_SIZE)?)),
            None => Ok(None),
        }
    }

    pub fn last_accepted(&self) -> Result<Option<BlockId>, CommitError> {
        self.read_id(&keys::LAST_ACCEPTED_KEY)
    }

    /// Id of the accepted block at `height`.
    pub fn block_id_at(&self, height: u64) -> Result<Option<BlockId>, CommitError> {
        self.read_id(&keys::height_key(height))
    }

    fn read_id(&self, key: &[u8]) -> Result<Option<BlockId>, CommitError> {
        let Some(bytes) = self.store.get(key)? else {
            return Ok(None);
        };
        let id: BlockId = bytes.as_slice().try_into().map_err(|_| {
            StateError::CorruptValue {
                key: hex::encode(key),
                reason: "block id is not 32 bytes".into(),
            }
        })?;
        Ok(Some(id))
    }
}

impl CommittedTransactions for ReceiptStore {
    fn is_committed(&self, id: &TxId) -> Result<bool, String> {
        self.store
            .has(&keys::receipt_key(id))
            .map_err(|e| e.to_string())
    }
}
