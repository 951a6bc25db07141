//! # Commit & Notification Subsystem
//!
//! Persists accepted blocks and tells the world about them.
//!
//! ## Commit Sequence
//!
//! ```text
//! Chain::accept
//!      │
//!      ▼
//! Committer::commit ──→ one WriteBatch ──→ KeyValueStore
//!      │                 ├─ ledger mutations (ChangeSet)
//!      │                 ├─ receipt per transaction
//!      │                 ├─ block bytes + height index
//!      │                 └─ last accepted pointer
//!      │
//!      ├──→ action counters (successes only)
//!      └──→ LedgerEvent::BlockAccepted, LedgerEvent::TransactionDecided × N
//! ```
//!
//! Nothing is published until the batch is durable. Feeds are lossy: a
//! subscriber that falls behind loses its oldest events.
//!
//! ## Reads
//!
//! `ReceiptStore` answers receipt and chain-pointer lookups, and serves as
//! the mempool's view of committed history.

pub mod committer;
pub mod error;
pub mod metrics;
pub mod receipts;

pub use committer::Committer;
pub use error::CommitError;
pub use metrics::CommitMetrics;
pub use receipts::ReceiptStore;
