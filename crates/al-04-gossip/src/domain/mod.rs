//! Gossip domain: configuration, wire message and errors.

pub mod config;
pub mod errors;
pub mod message;

pub use config::GossipConfig;
pub use errors::GossipError;
pub use message::GossipMessage;
