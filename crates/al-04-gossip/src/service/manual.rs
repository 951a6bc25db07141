//! Gossiper that only sends when told to.

use std::sync::Arc;

use al_03_mempool::{MempoolApi, SystemTimeSource, TimeSource};
use shared_types::{NodeId, Rules, Transaction};
use tracing::{debug, warn};

use crate::domain::{GossipConfig, GossipError, GossipMessage};
use crate::ports::{AppSender, Gossiper};
use crate::service::receive::admit_gossip;

/// Broadcasts pending transactions to every peer on `trigger_gossip`.
///
/// Used in test mode, where the harness decides when data moves.
pub struct ManualGossiper {
    mempool: Arc<dyn MempoolApi>,
    sender: Arc<dyn AppSender>,
    rules: Rules,
    config: GossipConfig,
    clock: Arc<dyn TimeSource>,
}

impl ManualGossiper {
    pub fn new(
        mempool: Arc<dyn MempoolApi>,
        sender: Arc<dyn AppSender>,
        rules: Rules,
        config: GossipConfig,
    ) -> Self {
        Self::with_clock(mempool, sender, rules, config, Arc::new(SystemTimeSource))
    }

    pub fn with_clock(
        mempool: Arc<dyn MempoolApi>,
        sender: Arc<dyn AppSender>,
        rules: Rules,
        config: GossipConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            mempool,
            sender,
            rules,
            config,
            clock,
        }
    }
}

impl Gossiper for ManualGossiper {
    fn on_admitted(&self, _tx: &Transaction) {}

    fn trigger_gossip(&self) -> Result<usize, GossipError> {
        let limit = self.config.gossip_max_size;
        let pending = self.mempool.peek_pending(limit as usize);
        let message = GossipMessage::pack(&pending, limit)?;
        if message.is_empty() {
            debug!("Nothing to gossip");
            return Ok(0);
        }
        let count = message.len();
        if let Err(e) = self.sender.send_app_gossip(message.encode()?) {
            warn!(error = %e, count, "Gossip dropped");
            return Ok(0);
        }
        debug!(count, "Gossiped pending transactions");
        Ok(count)
    }

    fn handle_app_gossip(&self, from: NodeId, bytes: &[u8]) -> usize {
        admit_gossip(
            self.mempool.as_ref(),
            &self.rules,
            self.clock.as_ref(),
            self.config.gossip_max_size,
            from,
            bytes,
        )
    }
}
