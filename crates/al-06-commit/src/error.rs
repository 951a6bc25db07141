use al_01_ledger_state::StateError;
use shared_types::{CodecError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("storage error: {0}")]
    State(#[from] StateError),

    #[error("encoding error: {0}")]
    Codec(#[from] CodecError),

    #[error("block has {txs} transactions but {results} results")]
    ResultCount { txs: usize, results: usize },
}

impl CommitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::State(e) => e.kind(),
            Self::Codec(_) | Self::ResultCount { .. } => ErrorKind::Validation,
        }
    }
}

impl From<CommitError> for StateError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::State(e) => e,
            CommitError::Codec(e) => StateError::Serialization(e),
            other => StateError::DatabaseError(other.to_string()),
        }
    }
}
