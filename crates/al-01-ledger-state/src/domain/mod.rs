pub mod change_set;
pub mod errors;
pub mod invariant;
pub mod keys;
pub mod view;

pub use change_set::ChangeSet;
pub use errors::StateError;
pub use invariant::{check_supply_invariant, SupplyMismatch};
pub use view::{Checkpoint, StateView};
