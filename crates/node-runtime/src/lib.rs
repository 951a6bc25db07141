//! # Node Runtime Library
//!
//! Wires the ledger subsystems into a `Node` and exposes the pieces the
//! binary and the multi-node tests need.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | `container` | `NodeConfig`, `Node` and its consensus, peer and client surfaces |
//! | `genesis` | Genesis description, chain id and genesis state |
//! | `adapters` | In-process `ChannelNetwork` and the round-robin builder schedule |
//! | `engine` | Single-node build/accept loop |

pub mod adapters;
pub mod container;
pub mod engine;
pub mod genesis;

pub use adapters::{ChannelNetwork, GossipEnvelope, NetworkSender, RoundRobinProposers};
pub use container::{ConfigError, NetworkConfig, Node, NodeConfig, NodeError};
pub use engine::{run_round, spawn_solo_engine};
pub use genesis::{Allocation, Genesis, GenesisError};
