//! # Inbound Port - Gossiper
//!
//! Driven by the client surface (admissions), the node's gossip timer or a
//! test harness (triggers) and the peer transport (received messages).

use shared_types::{NodeId, Transaction};

use crate::domain::GossipError;

pub trait Gossiper: Send + Sync {
    /// A transaction submitted by a local client was admitted.
    fn on_admitted(&self, tx: &Transaction);

    /// Gossips pending mempool transactions. Returns how many were sent.
    ///
    /// # Errors
    /// `Codec` when the message cannot be encoded. Send failures are
    /// logged and reported as zero sent.
    fn trigger_gossip(&self) -> Result<usize, GossipError>;

    /// Handles a gossip message from `from`. Returns how many transactions
    /// were admitted; everything else is dropped.
    fn handle_app_gossip(&self, from: NodeId, bytes: &[u8]) -> usize;
}
