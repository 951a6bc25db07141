use std::sync::Arc;

use al_01_ledger_state::ChangeSet;
use shared_types::{Block, BlockId, BlockStatus};

/// A block tracked by the arena.
#[derive(Debug, Clone)]
pub struct BlockEntry {
    pub id: BlockId,
    pub block: Block,
    pub status: BlockStatus,
    /// Mutations produced by executing the block; present while a verified
    /// block is processing.
    pub change_set: Option<Arc<ChangeSet>>,
    pub verified: bool,
    pub built_locally: bool,
}

impl BlockEntry {
    pub(crate) fn accepted(id: BlockId, block: Block) -> Self {
        Self {
            id,
            block,
            status: BlockStatus::Accepted,
            change_set: None,
            verified: true,
            built_locally: false,
        }
    }

    pub(crate) fn parsed(id: BlockId, block: Block) -> Self {
        Self {
            id,
            block,
            status: BlockStatus::Processing,
            change_set: None,
            verified: false,
            built_locally: false,
        }
    }

    pub(crate) fn built(id: BlockId, block: Block, changes: ChangeSet) -> Self {
        Self {
            id,
            block,
            status: BlockStatus::Processing,
            change_set: Some(Arc::new(changes)),
            verified: true,
            built_locally: true,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.status == BlockStatus::Processing
    }
}
