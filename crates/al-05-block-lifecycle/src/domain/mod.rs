//! Block arena and lifecycle state machine.

pub mod chain;
pub mod entry;

pub use chain::{Chain, ChainDependencies};
pub use entry::BlockEntry;
