//! # al-01-ledger-state
//!
//! Account and asset storage for the ledger.
//!
//! ## Model
//!
//! | Entry | Key | Value |
//! |-------|-----|-------|
//! | Balance | `0x00 \| address \| asset` | `u64` big-endian, absent = 0 |
//! | Asset | `0x01 \| asset` | bincode `Asset` |
//! | Receipt | `0x02 \| tx id` | bincode `Receipt` |
//! | Block | `0x03 \| block id` | canonical block bytes |
//! | Last accepted | `0x04` | block id |
//! | Height index | `0x05 \| height` | block id |
//!
//! ## Views
//!
//! ```text
//!   StateView (writes + journal)
//!        │ miss
//!        ↓
//!   ChangeSet of processing parent (newest first)
//!        │ miss
//!        ↓
//!   KeyValueStore (accepted state)
//! ```
//!
//! Block execution happens entirely inside a `StateView`. Only the commit
//! path writes to the store, in one `WriteBatch`.
//!
//! ## Invariants
//!
//! - Zero balances are never stored.
//! - A failed `add_balance`/`sub_balance` leaves the view unchanged.
//! - For every asset, supply equals the sum of its balances
//!   (`check_supply_invariant`).

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::MemoryStore;
pub use domain::*;
pub use ports::*;
