use serde::{Deserialize, Serialize};
use shared_types::codec::MAX_GOSSIP_SIZE;

/// Gossip tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GossipConfig {
    /// Skip gossip while this node is among the next `build_proposer_diff`
    /// builders.
    pub build_proposer_diff: usize,
    /// Number of upcoming builders that receive gossip.
    pub gossip_proposer_depth: usize,
    /// Byte budget of one gossip message; also the receive limit.
    pub gossip_max_size: u64,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            build_proposer_diff: 1,
            gossip_proposer_depth: 2,
            gossip_max_size: MAX_GOSSIP_SIZE,
        }
    }
}
