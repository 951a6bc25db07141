//! # Inbound Port - MempoolApi
//!
//! The driving port used by the client surface, the gossip receive path and
//! the block builder.

use shared_types::{Transaction, TxId};

use crate::domain::MempoolError;

/// Primary API of the mempool.
///
/// Every method is one critical section; no transaction is ever returned by
/// two `pop_n` calls unless it was restored in between.
pub trait MempoolApi: Send + Sync {
    /// Admits a structurally valid transaction.
    ///
    /// # Errors
    /// - `DuplicateTransaction`: id already pending or committed
    /// - `SenderLimitReached`, `PoolFull`: capacity bounds
    fn submit(&self, tx: Transaction) -> Result<TxId, MempoolError>;

    /// Hands out up to `max_count` pending transactions (and at most
    /// `max_units` units) in admission order, marking them pending inclusion.
    fn pop_n(&self, max_count: usize, max_units: u64, block_height: u64) -> Vec<Transaction>;

    /// Pending transactions in admission order, without marking them.
    fn peek_pending(&self, max_bytes: usize) -> Vec<Transaction>;

    /// Deletes transactions (block accepted, or dropped by the builder).
    fn remove(&self, ids: &[TxId]) -> usize;

    /// Returns handed-out transactions to the queue.
    fn restore(&self, ids: &[TxId]) -> usize;

    fn contains(&self, id: &TxId) -> bool;

    /// Number of transactions held, pending or pending inclusion.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
