//! Outbound (driven) ports for gossip.

use shared_types::NodeId;

use crate::domain::GossipError;

/// Fire-and-forget peer messaging.
///
/// Implementations must not block: a full peer queue is a send error.
pub trait AppSender: Send + Sync {
    /// Sends to every known peer.
    fn send_app_gossip(&self, bytes: Vec<u8>) -> Result<(), GossipError>;

    /// Sends to the listed peers only.
    fn send_app_gossip_specific(&self, peers: &[NodeId], bytes: Vec<u8>) -> Result<(), GossipError>;
}

/// Knowledge of who builds the upcoming blocks.
pub trait ProposerMonitor: Send + Sync {
    /// The next `depth` builders, soonest first. May contain the local node.
    fn proposers(&self, depth: usize) -> Vec<NodeId>;
}

/// Sender that records every message for inspection.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSender {
    /// `(None, bytes)` for a broadcast, `(Some(peers), bytes)` otherwise.
    pub sent: parking_lot::Mutex<Vec<(Option<Vec<NodeId>>, Vec<u8>)>>,
    pub fail: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl RecordingSender {
    fn record(&self, peers: Option<Vec<NodeId>>, bytes: Vec<u8>) -> Result<(), GossipError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(GossipError::Send("queue full".into()));
        }
        self.sent.lock().push((peers, bytes));
        Ok(())
    }
}

#[cfg(test)]
impl AppSender for RecordingSender {
    fn send_app_gossip(&self, bytes: Vec<u8>) -> Result<(), GossipError> {
        self.record(None, bytes)
    }

    fn send_app_gossip_specific(&self, peers: &[NodeId], bytes: Vec<u8>) -> Result<(), GossipError> {
        self.record(Some(peers.to_vec()), bytes)
    }
}

/// Fixed proposer schedule for testing.
#[cfg(test)]
pub struct FixedProposers(pub Vec<NodeId>);

#[cfg(test)]
impl ProposerMonitor for FixedProposers {
    fn proposers(&self, depth: usize) -> Vec<NodeId> {
        self.0.iter().take(depth).copied().collect()
    }
}
