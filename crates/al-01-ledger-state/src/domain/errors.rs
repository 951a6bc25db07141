use shared_types::{CodecError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("balance overflow: {current} + {amount} exceeds u64")]
    BalanceOverflow { current: u64, amount: u64 },

    #[error("corrupt value under key {key}: {reason}")]
    CorruptValue { key: String, reason: String },

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] CodecError),
}

impl StateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::BalanceOverflow { .. } => ErrorKind::Overflow,
            Self::CorruptValue { .. } | Self::DatabaseError(_) | Self::Serialization(_) => {
                ErrorKind::Validation
            }
        }
    }

    pub(crate) fn corrupt(key: &[u8], reason: impl Into<String>) -> Self {
        Self::CorruptValue {
            key: hex::encode(key),
            reason: reason.into(),
        }
    }
}
