//! Core domain entities for the mempool.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Transaction, TxId};

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Transaction state in the two-phase inclusion protocol.
///
/// ```text
/// [PENDING] ──pop_n──→ [PENDING_INCLUSION] ──remove──→ [DELETED]
///                               │
///                               └── restore/timeout ──→ [PENDING]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// Available for block inclusion.
    #[default]
    Pending,
    /// Handed to a block builder; invisible to other `pop_n` calls.
    PendingInclusion {
        /// Height of the block being built.
        block_height: u64,
        /// When the transaction was handed out (ms).
        proposed_at: Timestamp,
    },
}

/// A transaction in the mempool with its bookkeeping.
#[derive(Clone, Debug)]
pub struct MempoolTransaction {
    pub transaction: Transaction,
    pub id: TxId,
    pub sender: Address,
    /// Units the transaction consumes when executed.
    pub units: u64,
    /// Admission sequence number; lower was admitted first.
    pub seq: u64,
    pub state: TransactionState,
    /// When the transaction was admitted (ms).
    pub added_at: Timestamp,
}

impl MempoolTransaction {
    pub fn new(transaction: Transaction, units: u64, seq: u64, added_at: Timestamp) -> Self {
        Self {
            id: transaction.id(),
            sender: transaction.sender(),
            transaction,
            units,
            seq,
            state: TransactionState::Pending,
            added_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, TransactionState::Pending)
    }

    pub fn is_pending_inclusion(&self) -> bool {
        matches!(self.state, TransactionState::PendingInclusion { .. })
    }

    /// Moves the transaction to `PendingInclusion`.
    pub fn propose(&mut self, block_height: u64, now: Timestamp) -> Result<(), &'static str> {
        if self.is_pending_inclusion() {
            return Err("Transaction already pending inclusion");
        }
        self.state = TransactionState::PendingInclusion {
            block_height,
            proposed_at: now,
        };
        Ok(())
    }

    /// Returns the transaction to `Pending`.
    pub fn rollback(&mut self) -> Result<(), &'static str> {
        if !self.is_pending_inclusion() {
            return Err("Transaction not pending inclusion");
        }
        self.state = TransactionState::Pending;
        Ok(())
    }

    pub fn is_timed_out(&self, now: Timestamp, timeout_ms: u64) -> bool {
        match self.state {
            TransactionState::PendingInclusion { proposed_at, .. } => {
                now.saturating_sub(proposed_at) >= timeout_ms
            }
            TransactionState::Pending => false,
        }
    }
}

/// Mempool configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MempoolConfig {
    /// Maximum transactions in the pool.
    pub max_transactions: usize,
    /// Maximum transactions per sender.
    pub max_per_sender: usize,
    /// Pending inclusion timeout (milliseconds).
    pub pending_inclusion_timeout_ms: u64,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            max_transactions: 2048,
            max_per_sender: 512,
            pending_inclusion_timeout_ms: 30_000,
        }
    }
}

impl MempoolConfig {
    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_transactions: 100,
            max_per_sender: 4,
            pending_inclusion_timeout_ms: 1000,
        }
    }
}
