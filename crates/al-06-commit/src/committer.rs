//! Accepted block persistence and publication.

use std::sync::Arc;

use al_01_ledger_state::{keys, ChangeSet, KeyValueStore, StateError, WriteBatch};
use al_05_block_lifecycle::BlockCommitter;
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{codec, Block, BlockId, Receipt};
use tracing::{debug, info};

use crate::error::CommitError;
use crate::metrics::CommitMetrics;

pub struct Committer {
    store: Arc<dyn KeyValueStore>,
    publisher: Arc<dyn EventPublisher>,
    metrics: CommitMetrics,
}

impl Committer {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        publisher: Arc<dyn EventPublisher>,
        metrics: CommitMetrics,
    ) -> Self {
        Self {
            store,
            publisher,
            metrics,
        }
    }

    /// Writes a block with its mutations and receipts in one batch, then
    /// updates counters and publishes the feeds.
    pub fn commit(&self, id: &BlockId, block: &Block, changes: &ChangeSet) -> Result<(), CommitError> {
        if block.txs.len() != block.results.len() {
            return Err(CommitError::ResultCount {
                txs: block.txs.len(),
                results: block.results.len(),
            });
        }

        let mut batch = WriteBatch::new();
        changes.write_to(&mut batch);
        for (tx, result) in block.txs.iter().zip(&block.results) {
            let receipt = Receipt {
                timestamp: block.timestamp,
                success: result.success,
                units: result.units,
            };
            batch.put(keys::receipt_key(&tx.id()), codec::encode(&receipt)?);
        }
        batch.put(keys::block_key(id), block.to_bytes()?);
        batch.put(keys::height_key(block.height), id.to_vec());
        batch.put(keys::LAST_ACCEPTED_KEY.to_vec(), id.to_vec());
        let writes = batch.len();
        self.store.write_batch(batch)?;
        debug!(block = %hex::encode(&id[..8]), writes, "Committed block");

        for (tx, result) in block.txs.iter().zip(&block.results) {
            if result.success {
                self.metrics.counter(tx.action().kind()).inc();
            }
        }
        self.metrics.accepted_height.set(block.height as i64);

        let reached = self.publisher.publish(LedgerEvent::BlockAccepted {
            id: *id,
            block: block.clone(),
        });
        for (tx, result) in block.txs.iter().zip(&block.results) {
            self.publisher.publish(LedgerEvent::TransactionDecided {
                id: tx.id(),
                error: None,
                result: Some(result.clone()),
            });
        }
        info!(
            height = block.height,
            txs = block.txs.len(),
            subscribers = reached,
            "Block committed"
        );
        Ok(())
    }
}

impl BlockCommitter for Committer {
    fn commit(&self, id: &BlockId, block: &Block, changes: &ChangeSet) -> Result<(), StateError> {
        Committer::commit(self, id, block, changes).map_err(StateError::from)
    }
}
