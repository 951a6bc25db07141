//! # Transaction Pool - FIFO Queue and Two-Phase Inclusion
//!
//! ## Data Structures
//!
//! - `by_id`: O(1) lookup by transaction id
//! - `pending`: admission-ordered queue of PENDING ids (BTreeMap by seq)
//! - `by_sender`: per-sender entry count
//!
//! PENDING_INCLUSION entries stay in `by_id` but leave `pending`, so they
//! are never handed to a second builder.

use std::collections::{BTreeMap, HashMap};

use shared_types::{Address, Transaction, TxId};

use super::entities::{MempoolConfig, MempoolTransaction, Timestamp};
use super::errors::MempoolError;

/// Admission-ordered transaction pool.
#[derive(Debug)]
pub struct TransactionPool {
    config: MempoolConfig,
    by_id: HashMap<TxId, MempoolTransaction>,
    /// Only contains PENDING transactions.
    pending: BTreeMap<u64, TxId>,
    by_sender: HashMap<Address, usize>,
    next_seq: u64,
}

impl TransactionPool {
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            by_id: HashMap::new(),
            pending: BTreeMap::new(),
            by_sender: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    /// Number of transactions in the pool, in either state.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_inclusion_count(&self) -> usize {
        self.by_id.len() - self.pending.len()
    }

    pub fn contains(&self, id: &TxId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn get(&self, id: &TxId) -> Option<&MempoolTransaction> {
        self.by_id.get(id)
    }

    pub fn sender_count(&self, sender: &Address) -> usize {
        self.by_sender.get(sender).copied().unwrap_or(0)
    }

    /// Admits a transaction at the back of the queue.
    ///
    /// # Errors
    /// - `DuplicateTransaction` if the id is already present
    /// - `SenderLimitReached` if the sender has too many entries
    /// - `PoolFull` if at capacity
    pub fn add(&mut self, transaction: Transaction, units: u64, now: Timestamp) -> Result<TxId, MempoolError> {
        let id = transaction.id();
        if self.by_id.contains_key(&id) {
            return Err(MempoolError::DuplicateTransaction(id));
        }
        let sender = transaction.sender();
        if self.sender_count(&sender) >= self.config.max_per_sender {
            return Err(MempoolError::SenderLimitReached {
                address: sender,
                limit: self.config.max_per_sender,
            });
        }
        if self.by_id.len() >= self.config.max_transactions {
            return Err(MempoolError::PoolFull {
                capacity: self.config.max_transactions,
            });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(seq, id);
        *self.by_sender.entry(sender).or_insert(0) += 1;
        self.by_id
            .insert(id, MempoolTransaction::new(transaction, units, seq, now));
        Ok(id)
    }

    /// Hands out PENDING transactions in admission order and marks them
    /// PENDING_INCLUSION. Stops at the first transaction that would exceed
    /// `max_units`.
    pub fn pop_n(
        &mut self,
        max_count: usize,
        max_units: u64,
        block_height: u64,
        now: Timestamp,
    ) -> Vec<Transaction> {
        let mut selected = Vec::new();
        let mut units = 0u64;
        for id in self.pending.values() {
            if selected.len() >= max_count {
                break;
            }
            let Some(entry) = self.by_id.get(id) else {
                continue;
            };
            let Some(total) = units.checked_add(entry.units).filter(|t| *t <= max_units) else {
                break;
            };
            units = total;
            selected.push(*id);
        }

        let mut popped = Vec::with_capacity(selected.len());
        for id in selected {
            let Some(entry) = self.by_id.get_mut(&id) else {
                continue;
            };
            if entry.propose(block_height, now).is_ok() {
                self.pending.remove(&entry.seq);
                popped.push(entry.transaction.clone());
            }
        }
        popped
    }

    /// PENDING transactions in admission order whose encoded sizes sum to at
    /// most `max_bytes`. Does not change any state.
    pub fn peek_pending(&self, max_bytes: usize) -> Vec<Transaction> {
        let mut out = Vec::new();
        let mut bytes = 0usize;
        for id in self.pending.values() {
            let Some(entry) = self.by_id.get(id) else {
                continue;
            };
            let size = entry.transaction.size();
            if bytes.saturating_add(size) > max_bytes {
                break;
            }
            bytes += size;
            out.push(entry.transaction.clone());
        }
        out
    }

    /// Deletes transactions in any state. Returns the ids actually removed.
    pub fn remove(&mut self, ids: &[TxId]) -> Vec<TxId> {
        ids.iter()
            .filter_map(|id| self.remove_internal(id).map(|tx| tx.id))
            .collect()
    }

    fn remove_internal(&mut self, id: &TxId) -> Option<MempoolTransaction> {
        let entry = self.by_id.remove(id)?;
        self.pending.remove(&entry.seq);
        if let Some(count) = self.by_sender.get_mut(&entry.sender) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.by_sender.remove(&entry.sender);
            }
        }
        Some(entry)
    }

    /// Returns PENDING_INCLUSION transactions to PENDING at their original
    /// queue position. Returns the ids restored.
    pub fn restore(&mut self, ids: &[TxId]) -> Vec<TxId> {
        let mut restored = Vec::new();
        for id in ids {
            let Some(entry) = self.by_id.get_mut(id) else {
                continue;
            };
            if entry.rollback().is_ok() {
                self.pending.insert(entry.seq, *id);
                restored.push(*id);
            }
        }
        restored
    }

    /// Restores PENDING_INCLUSION transactions older than the timeout.
    pub fn restore_timed_out(&mut self, now: Timestamp) -> Vec<TxId> {
        let timeout_ms = self.config.pending_inclusion_timeout_ms;
        let timed_out: Vec<TxId> = self
            .by_id
            .values()
            .filter(|tx| tx.is_timed_out(now, timeout_ms))
            .map(|tx| tx.id)
            .collect();
        self.restore(&timed_out)
    }

    /// Removes PENDING transactions for which `is_expired` holds.
    pub fn prune<F>(&mut self, is_expired: F) -> Vec<TxId>
    where
        F: Fn(&Transaction) -> bool,
    {
        let expired: Vec<TxId> = self
            .pending
            .values()
            .filter(|id| {
                self.by_id
                    .get(*id)
                    .is_some_and(|entry| is_expired(&entry.transaction))
            })
            .copied()
            .collect();
        self.remove(&expired)
    }
}
