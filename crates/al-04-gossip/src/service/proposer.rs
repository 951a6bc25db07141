//! Proposer-aware gossiper.

use std::sync::Arc;

use al_03_mempool::{MempoolApi, SystemTimeSource, TimeSource};
use shared_types::{NodeId, Rules, Transaction};
use tracing::{debug, warn};

use crate::domain::{GossipConfig, GossipError, GossipMessage};
use crate::ports::{AppSender, Gossiper, ProposerMonitor};
use crate::service::receive::admit_gossip;

/// Sends transactions to the builders of the next few blocks.
pub struct ProposerGossiper {
    node_id: NodeId,
    mempool: Arc<dyn MempoolApi>,
    sender: Arc<dyn AppSender>,
    monitor: Arc<dyn ProposerMonitor>,
    rules: Rules,
    config: GossipConfig,
    clock: Arc<dyn TimeSource>,
}

impl ProposerGossiper {
    pub fn new(
        node_id: NodeId,
        mempool: Arc<dyn MempoolApi>,
        sender: Arc<dyn AppSender>,
        monitor: Arc<dyn ProposerMonitor>,
        rules: Rules,
        config: GossipConfig,
    ) -> Self {
        Self::with_clock(
            node_id,
            mempool,
            sender,
            monitor,
            rules,
            config,
            Arc::new(SystemTimeSource),
        )
    }

    /// Like `new`, but received transactions are validated against `clock`.
    pub fn with_clock(
        node_id: NodeId,
        mempool: Arc<dyn MempoolApi>,
        sender: Arc<dyn AppSender>,
        monitor: Arc<dyn ProposerMonitor>,
        rules: Rules,
        config: GossipConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            node_id,
            mempool,
            sender,
            monitor,
            rules,
            config,
            clock,
        }
    }

    /// Peers to gossip to, or `None` when this node builds soon enough to
    /// include the transactions itself.
    fn targets(&self) -> Option<Vec<NodeId>> {
        let horizon = self
            .config
            .build_proposer_diff
            .max(self.config.gossip_proposer_depth);
        let upcoming = self.monitor.proposers(horizon);
        if upcoming
            .iter()
            .take(self.config.build_proposer_diff)
            .any(|p| *p == self.node_id)
        {
            debug!(node = %self.node_id, "Upcoming builder, holding transactions");
            return None;
        }
        let mut targets: Vec<NodeId> = Vec::new();
        for peer in upcoming.into_iter().take(self.config.gossip_proposer_depth) {
            if peer != self.node_id && !targets.contains(&peer) {
                targets.push(peer);
            }
        }
        (!targets.is_empty()).then_some(targets)
    }

    fn send(&self, message: GossipMessage) -> Result<usize, GossipError> {
        if message.is_empty() {
            return Ok(0);
        }
        let Some(targets) = self.targets() else {
            return Ok(0);
        };
        let count = message.len();
        if let Err(e) = self
            .sender
            .send_app_gossip_specific(&targets, message.encode()?)
        {
            warn!(error = %e, count, "Gossip dropped");
            return Ok(0);
        }
        debug!(count, peers = targets.len(), "Gossiped to upcoming builders");
        Ok(count)
    }
}

impl Gossiper for ProposerGossiper {
    fn on_admitted(&self, tx: &Transaction) {
        let sent = GossipMessage::from_transactions(std::slice::from_ref(tx))
            .map_err(GossipError::from)
            .and_then(|message| self.send(message));
        if let Err(e) = sent {
            warn!(tx = %hex::encode(tx.id()), error = %e, "Gossip of admitted transaction failed");
        }
    }

    fn trigger_gossip(&self) -> Result<usize, GossipError> {
        let limit = self.config.gossip_max_size;
        let pending = self.mempool.peek_pending(limit as usize);
        self.send(GossipMessage::pack(&pending, limit)?)
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
