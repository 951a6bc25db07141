//! # Adapters
//!
//! Implementations of the gossip outbound ports for an in-process network.

pub mod network;
pub mod proposers;

pub use network::{ChannelNetwork, GossipEnvelope, NetworkSender};
pub use proposers::RoundRobinProposers;
