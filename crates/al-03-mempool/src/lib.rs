//! # Transaction Pool (Mempool)
//!
//! Holds transactions awaiting block inclusion.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | No duplicate ids, pending or committed | `Mempool::submit` |
//! | Admission order is execution order | `TransactionPool::pending` keyed by sequence |
//! | A handed-out transaction is invisible to other builders | `pop_n` moves it to PENDING_INCLUSION |
//! | Stuck handouts come back | `restore_timed_out` |
//!
//! ## Two-Phase Inclusion
//!
//! Transactions are NEVER deleted when handed to a builder. Deletion
//! happens only when the block containing them is accepted.
//!
//! ```text
//! [PENDING] ──pop_n──→ [PENDING_INCLUSION] ──remove──→ [DELETED]
//!                               │
//!                               └── restore/timeout ──→ [PENDING]
//! ```
//!
//! | Stage | Method | Effect |
//! |-------|--------|--------|
//! | Handout | `pop_n()` | Move to PENDING_INCLUSION, NOT deleted |
//! | Confirm | `remove()` | Permanently delete |
//! | Rollback | `restore()` | Return to PENDING at original position |
//! | Timeout | `restore_timed_out()` | Rollback after `pending_inclusion_timeout_ms` |
//!
//! ## Module Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs - Mempool: one mutex around the pool               │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - MempoolApi trait                          │
//! │  ports/outbound.rs - CommittedTransactions, TimeSource traits  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/entities.rs - MempoolTransaction, TransactionState     │
//! │  domain/pool.rs     - TransactionPool (FIFO + indices)         │
//! │  domain/errors.rs   - MempoolError                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::*;
pub use service::Mempool;
