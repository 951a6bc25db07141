//! # Node Container
//!
//! Configuration and the node context that owns every subsystem.

pub mod config;
pub mod node;

pub use config::{ConfigError, NetworkConfig, NodeConfig};
pub use node::{Node, NodeError};
