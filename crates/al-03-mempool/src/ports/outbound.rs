//! Outbound (driven) ports for the mempool.

use shared_types::TxId;

use crate::domain::Timestamp;

/// Lookup into committed transaction history.
///
/// Used to refuse transactions that were already included in an accepted
/// block.
pub trait CommittedTransactions: Send + Sync {
    fn is_committed(&self, id: &TxId) -> Result<bool, String>;
}

/// Time source for consistent timestamp handling.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Committed history that contains nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommittedHistory;

impl CommittedTransactions for NoCommittedHistory {
    fn is_committed(&self, _id: &TxId) -> Result<bool, String> {
        Ok(false)
    }
}

/// Mock committed history for testing.
#[cfg(test)]
#[derive(Default)]
pub struct MockCommittedTransactions {
    pub committed: parking_lot::Mutex<std::collections::HashSet<TxId>>,
}

#[cfg(test)]
impl CommittedTransactions for MockCommittedTransactions {
    fn is_committed(&self, id: &TxId) -> Result<bool, String> {
        Ok(self.committed.lock().contains(id))
    }
}

/// Manually advanced clock for testing.
#[cfg(test)]
#[derive(Default)]
pub struct MockTimeSource {
    pub now: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}
