//! # Block Lifecycle Subsystem
//!
//! Builds blocks from the mempool, verifies blocks from peers by
//! re-execution and drives each block through its lifecycle on behalf of
//! the consensus engine.
//!
//! ## Lifecycle
//!
//! ```text
//!   build_block / parse_block
//!             │
//!             ▼
//!      [Processing] ──verify──→ [Processing, verified] ──accept──→ [Accepted]
//!             │                          │
//!             └──────────reject──────────┴──────────────→ [Rejected]
//! ```
//!
//! ## Rules
//!
//! | Operation | Requires | Effect |
//! |-----------|----------|--------|
//! | `build_block` | usable parent, no local candidate on it yet | pops the mempool, executes, inserts a verified block |
//! | `verify` | known, non-rejected parent | re-executes; results must match the block's |
//! | `accept` | verified, parent is last accepted | commits mutations and receipts, removes txs from the mempool |
//! | `reject` | not accepted | drops mutations, restores txs to the mempool |
//! | `set_preference` | processing or last accepted | advisory only |
//!
//! ## State Layering
//!
//! A block's mutations live in its `ChangeSet` until acceptance. Building
//! or verifying a child stacks the change sets of every processing
//! ancestor on top of the durable store, so a chain of undecided blocks
//! can grow without touching disk.
//!
//! Blocks are kept in an arena keyed by id; parents are looked up by id.
//! Accepted ancestors and rejected blocks are pruned from the arena on
//! each acceptance; accepted blocks stay readable from the store.

pub mod builder;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;

pub use builder::{Builder, EngineMessage, ManualBuilder, TimeBuilder};
pub use config::BuilderConfig;
pub use domain::{BlockEntry, Chain, ChainDependencies};
pub use error::BlockError;
pub use metrics::LifecycleMetrics;
pub use ports::BlockCommitter;
