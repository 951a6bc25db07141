//! # al-02-action-executor
//!
//! Deterministic state transition function of the ledger.
//!
//! ## Actions
//!
//! | Action | Fails with | Effect |
//! |--------|-----------|--------|
//! | `CreateAsset` | metadata too large | new asset keyed by the tx id, owner = signer, supply 0 |
//! | `MintAsset` | value not populated, asset missing, wrong owner, supply overflow | credit `to`, raise supply |
//! | `Transfer` | insufficient balance | debit signer, credit `to` |
//!
//! A failing action leaves state exactly as before the call. Failures are
//! recorded as failed results; they never abort a block.
//!
//! ## Units
//!
//! `base_units` (from genesis) plus 72 for a mint or a transfer, and
//! 32 + metadata length for an asset creation.

pub mod domain;
pub mod errors;

pub use domain::*;
pub use errors::{ActionError, ExecutionError};
