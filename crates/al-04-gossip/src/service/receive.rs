//! Receive path shared by every gossiper.

use al_03_mempool::{MempoolApi, TimeSource};
use shared_types::{parse_transaction, NodeId, Rules};
use tracing::debug;

use crate::domain::GossipMessage;

/// Decodes a gossip message and admits each valid transaction.
///
/// Returns the number admitted. Nothing here is reported back to `from`.
pub(crate) fn admit_gossip(
    mempool: &dyn MempoolApi,
    rules: &Rules,
    clock: &dyn TimeSource,
    limit: u64,
    from: NodeId,
    bytes: &[u8],
) -> usize {
    let message = match GossipMessage::decode(bytes, limit) {
        Ok(message) => message,
        Err(e) => {
            debug!(peer = %from, error = %e, "Dropping malformed gossip");
            return 0;
        }
    };
    let now = (clock.now() / 1000) as i64;
    let mut admitted = 0;
    for raw in &message.txs {
        let tx = match parse_transaction(raw, rules, now) {
            Ok(tx) => tx,
            Err(e) => {
                debug!(peer = %from, error = %e, "Dropping invalid gossiped transaction");
                continue;
            }
        };
        match mempool.submit(tx) {
            Ok(_) => admitted += 1,
            Err(e) => debug!(peer = %from, error = %e, "Gossiped transaction not admitted"),
        }
    }
    debug!(peer = %from, received = message.len(), admitted, "Handled gossip");
    admitted
}
