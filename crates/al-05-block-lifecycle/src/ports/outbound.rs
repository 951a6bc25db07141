//! Outbound ports for the block lifecycle.

use al_01_ledger_state::{ChangeSet, StateError};
use shared_types::{Block, BlockId};

/// Durable commit of an accepted block.
///
/// The block's mutations, its receipts and the chain pointers must land in
/// one atomic write.
pub trait BlockCommitter: Send + Sync {
    fn commit(&self, id: &BlockId, block: &Block, changes: &ChangeSet) -> Result<(), StateError>;
}

/// Committer writing straight into a store, for tests.
#[cfg(test)]
pub struct StoreCommitter {
    pub store: std::sync::Arc<dyn al_01_ledger_state::KeyValueStore>,
    pub committed: parking_lot::Mutex<std::collections::HashSet<shared_types::TxId>>,
}

#[cfg(test)]
impl StoreCommitter {
    pub fn new(store: std::sync::Arc<dyn al_01_ledger_state::KeyValueStore>) -> Self {
        Self {
            store,
            committed: Default::default(),
        }
    }
}

#[cfg(test)]
impl BlockCommitter for StoreCommitter {
    fn commit(&self, id: &BlockId, block: &Block, changes: &ChangeSet) -> Result<(), StateError> {
        let mut batch = al_01_ledger_state::WriteBatch::new();
        changes.write_to(&mut batch);
        batch.put(al_01_ledger_state::keys::block_key(id), block.to_bytes()?);
        self.store.write_batch(batch)?;
        self.committed
            .lock()
            .extend(block.txs.iter().map(shared_types::Transaction::id));
        Ok(())
    }
}

#[cfg(test)]
impl al_03_mempool::CommittedTransactions for StoreCommitter {
    fn is_committed(&self, id: &shared_types::TxId) -> Result<bool, String> {
        Ok(self.committed.lock().contains(id))
    }
}
