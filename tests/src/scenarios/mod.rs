//! # Multi-Node Scenarios
//!
//! Each scenario drives one or more test-mode nodes through the public
//! `Node` surface only.

pub mod gossip;
pub mod ledger;
pub mod lifecycle;
