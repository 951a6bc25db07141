//! Mempool error types.

use shared_types::{Address, ErrorKind, TransactionError, TxId};

/// Mempool error type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MempoolError {
    /// Transaction already pending, or already included in an accepted block.
    DuplicateTransaction(TxId),

    /// Pool has reached maximum capacity.
    PoolFull { capacity: usize },

    /// Sender has reached its pending transaction limit.
    SenderLimitReached { address: Address, limit: usize },

    /// Transaction failed structural validation.
    Invalid(TransactionError),

    /// Committed-history lookup failed.
    Lookup(String),
}

impl MempoolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateTransaction(_) => ErrorKind::Duplicate,
            Self::Invalid(e) => e.kind(),
            Self::PoolFull { .. } | Self::SenderLimitReached { .. } | Self::Lookup(_) => {
                ErrorKind::Validation
            }
        }
    }
}

impl std::fmt::Display for MempoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTransaction(id) => {
                write!(f, "Duplicate transaction: {}", hex::encode(&id[..4]))
            }
            Self::PoolFull { capacity } => write!(f, "Pool full at {} transactions", capacity),
            Self::SenderLimitReached { address, limit } => write!(
                f,
                "Sender {} reached limit of {} transactions",
                hex::encode(&address[..4]),
                limit
            ),
            Self::Invalid(e) => write!(f, "Invalid transaction: {}", e),
            Self::Lookup(msg) => write!(f, "Committed lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for MempoolError {}

impl From<TransactionError> for MempoolError {
    fn from(error: TransactionError) -> Self {
        Self::Invalid(error)
    }
}
