//! Round-robin builder schedule.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use al_04_gossip::ProposerMonitor;
use shared_types::NodeId;

/// Block `h` is built by `validators[h % n]`. `height` is the height of the
/// node's preferred block, kept current by the node on every decision.
pub struct RoundRobinProposers {
    validators: Vec<NodeId>,
    height: Arc<AtomicU64>,
}

impl RoundRobinProposers {
    pub fn new(validators: Vec<NodeId>, height: Arc<AtomicU64>) -> Self {
        Self { validators, height }
    }
}

impl ProposerMonitor for RoundRobinProposers {
    fn proposers(&self, depth: usize) -> Vec<NodeId> {
        if self.validators.is_empty() {
            return Vec::new();
        }
        let next = self.height.load(Ordering::SeqCst).wrapping_add(1);
        let n = self.validators.len() as u64;
        (0..depth as u64)
            .map(|i| self.validators[(next.wrapping_add(i) % n) as usize])
            .collect()
    }
}
