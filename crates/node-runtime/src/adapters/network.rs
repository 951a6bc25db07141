//! In-process transport.
//!
//! Every node that joins gets a bounded inbound queue. Sends use
//! `try_send`, so a slow peer loses messages instead of stalling the
//! sender.

use std::collections::HashMap;
use std::sync::Arc;

use al_04_gossip::{AppSender, GossipError};
use parking_lot::RwLock;
use shared_types::NodeId;
use tokio::sync::mpsc;
use tracing::debug;

/// A gossip message in flight.
#[derive(Debug, Clone)]
pub struct GossipEnvelope {
    pub from: NodeId,
    pub bytes: Vec<u8>,
}

pub struct ChannelNetwork {
    peers: RwLock<HashMap<NodeId, mpsc::Sender<GossipEnvelope>>>,
    queue_size: usize,
}

impl ChannelNetwork {
    pub fn new(queue_size: usize) -> Arc<Self> {
        Arc::new(Self {
            peers: RwLock::new(HashMap::new()),
            queue_size: queue_size.max(1),
        })
    }

    /// Registers `node` and returns its inbound queue. Joining again
    /// replaces the previous queue.
    pub fn join(&self, node: NodeId) -> mpsc::Receiver<GossipEnvelope> {
        let (tx, rx) = mpsc::channel(self.queue_size);
        self.peers.write().insert(node, tx);
        debug!(node = %node, "Joined network");
        rx
    }

    pub fn leave(&self, node: &NodeId) {
        self.peers.write().remove(node);
    }

    /// Registered nodes, sorted.
    pub fn peers(&self) -> Vec<NodeId> {
        let mut peers: Vec<NodeId> = self.peers.read().keys().copied().collect();
        peers.sort();
        peers
    }

    /// An `AppSender` that sends as `local`.
    pub fn sender_for(self: &Arc<Self>, local: NodeId) -> NetworkSender {
        NetworkSender {
            network: Arc::clone(self),
            local,
        }
    }

    fn deliver(&self, from: NodeId, to: &NodeId, bytes: Vec<u8>) -> Result<(), GossipError> {
        let peers = self.peers.read();
        let queue = peers
            .get(to)
            .ok_or_else(|| GossipError::Send(format!("unknown peer {}", to)))?;
        queue
            .try_send(GossipEnvelope { from, bytes })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    GossipError::Send(format!("peer {} queue full", to))
                }
                mpsc::error::TrySendError::Closed(_) => {
                    GossipError::Send(format!("peer {} disconnected", to))
                }
            })
    }

    /// Attempts every target and reports the first failure.
    fn deliver_all<'a>(
        &self,
        from: NodeId,
        targets: impl Iterator<Item = &'a NodeId>,
        bytes: Vec<u8>,
    ) -> Result<(), GossipError> {
        let mut first_error = None;
        for to in targets.filter(|to| **to != from) {
            if let Err(e) = self.deliver(from, to, bytes.clone()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

pub struct NetworkSender {
    network: Arc<ChannelNetwork>,
    local: NodeId,
}

impl AppSender for NetworkSender {
    fn send_app_gossip(&self, bytes: Vec<u8>) -> Result<(), GossipError> {
        let peers = self.network.peers();
        self.network.deliver_all(self.local, peers.iter(), bytes)
    }

    fn send_app_gossip_specific(&self, peers: &[NodeId], bytes: Vec<u8>) -> Result<(), GossipError> {
        self.network.deliver_all(self.local, peers.iter(), bytes)
    }
}
