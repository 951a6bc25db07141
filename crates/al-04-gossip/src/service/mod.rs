//! Gossiper implementations.

pub mod manual;
pub mod proposer;
mod receive;

pub use manual::ManualGossiper;
pub use proposer::ProposerGossiper;
