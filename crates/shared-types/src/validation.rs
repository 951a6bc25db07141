//! # Structural Validation
//!
//! Checks a transaction must pass before admission or inclusion. These
//! depend only on the transaction and the rules, never on ledger state.

use crate::auth::verify_auth;
use crate::entities::{Action, Transaction};
use crate::errors::TransactionError;
use crate::rules::{Rules, MAX_METADATA_SIZE};

/// Validates `tx` against `rules` at time `now` (unix seconds).
pub fn validate_transaction(tx: &Transaction, rules: &Rules, now: i64) -> Result<(), TransactionError> {
    let base = tx.base();
    if base.chain_id != rules.chain_id {
        return Err(TransactionError::WrongChainId);
    }
    if rules.is_expired(base.timestamp, now) {
        return Err(TransactionError::TimestampTooLate {
            timestamp: base.timestamp,
            now,
        });
    }
    if base.timestamp > now.saturating_add(rules.validity_window_secs) {
        return Err(TransactionError::TimestampTooEarly {
            timestamp: base.timestamp,
            now,
        });
    }
    if base.unit_price < rules.min_unit_price {
        return Err(TransactionError::UnitPriceTooLow {
            price: base.unit_price,
            min: rules.min_unit_price,
        });
    }
    if let Action::CreateAsset { metadata } = tx.action() {
        if metadata.len() > MAX_METADATA_SIZE {
            return Err(TransactionError::MetadataTooLarge {
                size: metadata.len(),
                limit: MAX_METADATA_SIZE,
            });
        }
    }
    // Signature last: it is the expensive check.
    if !verify_auth(tx) {
        return Err(TransactionError::InvalidSignature);
    }
    Ok(())
}

/// Decodes and validates raw transaction bytes.
pub fn parse_transaction(bytes: &[u8], rules: &Rules, now: i64) -> Result<Transaction, TransactionError> {
    let tx = Transaction::from_bytes(bytes)?;
    validate_transaction(&tx, rules, now)?;
    Ok(tx)
}
