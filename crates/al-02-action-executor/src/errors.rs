//! # Error Types

use al_01_ledger_state::StateError;
use shared_types::ErrorKind;
use thiserror::Error;

// =============================================================================
// ACTION ERRORS
// =============================================================================

/// Reasons an action fails. The display string is recorded verbatim as the
/// failed result's output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("metadata too large")]
    MetadataTooLarge,

    #[error("value not populated")]
    ValueNotPopulated,

    #[error("asset missing")]
    AssetMissing,

    #[error("wrong owner")]
    WrongOwner,

    #[error("supply overflow")]
    SupplyOverflow,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("balance overflow")]
    BalanceOverflow,

    /// Storage failed underneath the action. Not a recordable outcome.
    #[error("state error: {0}")]
    State(StateError),
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MetadataTooLarge | Self::ValueNotPopulated => ErrorKind::Validation,
            Self::AssetMissing => ErrorKind::NotFound,
            Self::WrongOwner => ErrorKind::Authorization,
            Self::SupplyOverflow | Self::BalanceOverflow => ErrorKind::Overflow,
            Self::InsufficientBalance => ErrorKind::InsufficientBalance,
            Self::State(e) => e.kind(),
        }
    }
}

impl From<StateError> for ActionError {
    fn from(error: StateError) -> Self {
        match error {
            StateError::InsufficientBalance { .. } => Self::InsufficientBalance,
            StateError::BalanceOverflow { .. } => Self::BalanceOverflow,
            other => Self::State(other),
        }
    }
}

// =============================================================================
// EXECUTION ERRORS
// =============================================================================

/// A transaction that cannot be executed at all and yields no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("cannot pay fee of {fee}: balance {available}")]
    InsufficientFee { fee: u64, available: u64 },

    #[error("fee overflow: {units} units at price {unit_price}")]
    FeeOverflow { units: u64, unit_price: u64 },

    #[error("native asset missing")]
    NativeAssetMissing,

    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl ExecutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientFee { .. } => ErrorKind::InsufficientBalance,
            Self::FeeOverflow { .. } => ErrorKind::Overflow,
            Self::NativeAssetMissing => ErrorKind::NotFound,
            Self::State(e) => e.kind(),
        }
    }

    /// Whether this is the transaction's fault rather than the node's.
    pub fn is_fee_error(&self) -> bool {
        !matches!(self, Self::State(_))
    }
}
