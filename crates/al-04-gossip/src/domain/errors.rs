use shared_types::{CodecError, ErrorKind};
use thiserror::Error;

/// Gossip failures. None of them are surfaced to the transaction's author.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GossipError {
    #[error("malformed gossip message: {0}")]
    Codec(#[from] CodecError),

    #[error("gossip send failed: {0}")]
    Send(String),
}

impl GossipError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
