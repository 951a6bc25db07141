//! # Transaction Gossip Subsystem
//!
//! Disseminates locally submitted transactions to the peers most likely to
//! build the next blocks, and admits transactions received from peers into
//! the local mempool.
//!
//! ## Delivery Model
//!
//! Gossip is at-most-once and unacknowledged. A send that fails is logged
//! and forgotten; the transaction stays in the sender's mempool and is
//! carried again by a later trigger.
//!
//! | Gossiper            | Sends when               | Sends to                          |
//! |---------------------|--------------------------|-----------------------------------|
//! | `ManualGossiper`    | `trigger_gossip()` only  | every peer                        |
//! | `ProposerGossiper`  | admission and trigger    | next `gossip_proposer_depth` builders |
//!
//! `ProposerGossiper` keeps quiet while the local node is among the next
//! `build_proposer_diff` builders: it will include the transactions itself.
//!
//! ## Receive Path
//!
//! ```text
//! bytes ──decode──→ Vec<Vec<u8>> ──parse_transaction──→ Mempool::submit
//!           │                            │                      │
//!           └──── drop (debug log) ──────┴──────────────────────┘
//! ```
//!
//! Received transactions are never re-gossiped.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  service/manual.rs   - ManualGossiper                        │
//! │  service/proposer.rs - ProposerGossiper                      │
//! │  service/receive.rs  - shared decode/validate/admit path     │
//! └──────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - Gossiper trait                          │
//! │  ports/outbound.rs - AppSender, ProposerMonitor traits       │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::{ManualGossiper, ProposerGossiper};
