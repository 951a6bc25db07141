//! # Shared Types Crate
//!
//! Domain entities, the wire codec, Ed25519 authorization, chain rules and
//! the error taxonomy shared by every ledger subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **Canonical Bytes**: every id is the SHA-256 of a value's canonical
//!   bincode encoding, so identical content always has an identical id.
//! - **Closed Actions**: `Action` is a closed enum; its variant order is the
//!   wire discriminant.

pub mod auth;
pub mod codec;
pub mod entities;
pub mod errors;
pub mod rules;
pub mod validation;

pub use auth::{verify_auth, KeyPair};
pub use codec::CodecError;
pub use entities::*;
pub use errors::*;
pub use rules::*;
pub use validation::{parse_transaction, validate_transaction};

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
