//! # Error Types
//!
//! The error taxonomy shared by every subsystem, plus the structural
//! (pre-admission) transaction errors.

use thiserror::Error;

use crate::codec::CodecError;

/// Classification every subsystem error maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or oversized input.
    Validation,
    /// Referenced asset, block or account is absent.
    NotFound,
    /// Signer lacks the required permission.
    Authorization,
    /// Arithmetic bound exceeded.
    Overflow,
    /// Not enough balance for a debit.
    InsufficientBalance,
    /// Transaction already pending or committed.
    Duplicate,
    /// Accept called out of parent order.
    ConsensusSequence,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::NotFound => "not found",
            Self::Authorization => "authorization",
            Self::Overflow => "overflow",
            Self::InsufficientBalance => "insufficient balance",
            Self::Duplicate => "duplicate",
            Self::ConsensusSequence => "consensus sequence",
        };
        f.write_str(name)
    }
}

/// Structural transaction failures. A transaction failing any of these
/// never enters the mempool and never reaches execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("malformed transaction: {0}")]
    Malformed(#[from] CodecError),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("wrong chain id")]
    WrongChainId,

    #[error("timestamp too late: {timestamp} expired before {now}")]
    TimestampTooLate { timestamp: i64, now: i64 },

    #[error("timestamp too early: {timestamp} is beyond {now} plus the validity window")]
    TimestampTooEarly { timestamp: i64, now: i64 },

    #[error("unit price {price} below minimum {min}")]
    UnitPriceTooLow { price: u64, min: u64 },

    #[error("size is larger than limit: {size} > {limit}")]
    MetadataTooLarge { size: usize, limit: usize },
}

impl TransactionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSignature => ErrorKind::Authorization,
            _ => ErrorKind::Validation,
        }
    }
}
