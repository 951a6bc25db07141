//! # Mempool Service
//!
//! Wraps the `TransactionPool` in a single mutex and wires the committed
//! history and clock ports.

use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{Rules, Transaction, TxId};
use tracing::{debug, info};

use crate::domain::{MempoolConfig, MempoolError, TransactionPool};
use crate::ports::{CommittedTransactions, MempoolApi, SystemTimeSource, TimeSource};

/// Thread-safe mempool.
pub struct Mempool {
    pool: Mutex<TransactionPool>,
    rules: Rules,
    committed: Arc<dyn CommittedTransactions>,
    clock: Arc<dyn TimeSource>,
}

impl Mempool {
    pub fn new(config: MempoolConfig, rules: Rules, committed: Arc<dyn CommittedTransactions>) -> Self {
        Self::with_clock(config, rules, committed, Arc::new(SystemTimeSource))
    }

    pub fn with_clock(
        config: MempoolConfig,
        rules: Rules,
        committed: Arc<dyn CommittedTransactions>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            pool: Mutex::new(TransactionPool::new(config)),
            rules,
            committed,
            clock,
        }
    }

    pub fn config(&self) -> MempoolConfig {
        self.pool.lock().config().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.pool.lock().pending_count()
    }

    /// Drops pending transactions outside the validity window at `now`
    /// (unix seconds).
    pub fn prune_expired(&self, now: i64) -> Vec<TxId> {
        let rules = &self.rules;
        let removed = self
            .pool
            .lock()
            .prune(|tx| rules.is_expired(tx.base().timestamp, now));
        if !removed.is_empty() {
            info!(count = removed.len(), "Pruned expired transactions");
        }
        removed
    }

    /// Returns transactions stuck in pending inclusion past the timeout.
    pub fn restore_timed_out(&self) -> Vec<TxId> {
        let now = self.clock.now();
        let restored = self.pool.lock().restore_timed_out(now);
        if !restored.is_empty() {
            info!(count = restored.len(), "Restored timed out transactions");
        }
        restored
    }
}

impl MempoolApi for Mempool {
    fn submit(&self, tx: Transaction) -> Result<TxId, MempoolError> {
        let units = self.rules.units(tx.action());
        let now = self.clock.now();
        let mut pool = self.pool.lock();
        if pool.contains(&tx.id()) {
            return Err(MempoolError::DuplicateTransaction(tx.id()));
        }
        if self
            .committed
            .is_committed(&tx.id())
            .map_err(MempoolError::Lookup)?
        {
            return Err(MempoolError::DuplicateTransaction(tx.id()));
        }
        let id = pool.add(tx, units, now)?;
        debug!(tx = %hex::encode(id), pool_size = pool.len(), "Transaction admitted");
        Ok(id)
    }

    fn pop_n(&self, max_count: usize, max_units: u64, block_height: u64) -> Vec<Transaction> {
        let now = self.clock.now();
        self.pool.lock().pop_n(max_count, max_units, block_height, now)
    }

    fn peek_pending(&self, max_bytes: usize) -> Vec<Transaction> {
        self.pool.lock().peek_pending(max_bytes)
    }

    fn remove(&self, ids: &[TxId]) -> usize {
        self.pool.lock().remove(ids).len()
    }

    fn restore(&self, ids: &[TxId]) -> usize {
        self.pool.lock().restore(ids).len()
    }

    fn contains(&self, id: &TxId) -> bool {
        self.pool.lock().contains(id)
    }

    fn len(&self) -> usize {
        self.pool.lock().len()
    }
}
