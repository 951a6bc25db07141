//! Ports layer (hexagonal architecture).

pub mod inbound;
pub mod outbound;

pub use inbound::MempoolApi;
pub use outbound::{CommittedTransactions, NoCommittedHistory, SystemTimeSource, TimeSource};
