//! Error types for the block lifecycle

use al_01_ledger_state::StateError;
use shared_types::{CodecError, ErrorKind};
use thiserror::Error;

/// Errors returned to the consensus engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("block not found: {0}")]
    NotFound(String),

    #[error("unknown parent: {0}")]
    UnknownParent(String),

    #[error("cannot build on {0}")]
    InvalidParent(String),

    /// Nothing in the mempool could be included.
    #[error("No transactions available")]
    NoTransactions,

    /// A locally built candidate on this parent is still processing.
    #[error("already built a block on parent {0}")]
    AlreadyBuilt(String),

    #[error("block verification failed: {0}")]
    Verification(String),

    #[error("block is not verified")]
    NotVerified,

    #[error("consensus sequence violation: {0}")]
    ConsensusSequence(String),

    #[error("cannot prefer {0}")]
    InvalidPreference(String),

    #[error("malformed block: {0}")]
    Malformed(#[from] CodecError),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("commit failed: {0}")]
    Commit(String),

    #[error("committed history lookup failed: {0}")]
    History(String),
}

impl BlockError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::UnknownParent(_) => ErrorKind::NotFound,
            Self::AlreadyBuilt(_) => ErrorKind::Duplicate,
            Self::ConsensusSequence(_) => ErrorKind::ConsensusSequence,
            Self::State(e) => e.kind(),
            Self::InvalidParent(_)
            | Self::NoTransactions
            | Self::Verification(_)
            | Self::NotVerified
            | Self::InvalidPreference(_)
            | Self::Malformed(_)
            | Self::Commit(_)
            | Self::History(_) => ErrorKind::Validation,
        }
    }

    /// Whether a later build attempt may succeed without outside action.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoTransactions | Self::AlreadyBuilt(_))
    }
}
