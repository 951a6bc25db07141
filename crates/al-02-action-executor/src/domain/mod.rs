pub mod actions;
pub mod execution;

pub use actions::{apply, AuthContext};
pub use execution::{execute_transaction, fee_for};
