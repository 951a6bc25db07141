//! # Solo Engine
//!
//! A stand-in for the consensus driver when a node runs alone: every build
//! signal becomes build, verify, prefer and accept on the preferred tip.
//! Multi-node agreement is left to an external driver using the same
//! `Node` surface.

use std::sync::Arc;

use al_05_block_lifecycle::{BlockError, EngineMessage};
use shared_types::BlockId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::container::{Node, NodeError};

/// Builds and accepts one block. Returns `None` when there was nothing to
/// build.
pub fn run_round(node: &Node) -> Result<Option<BlockId>, NodeError> {
    let block = match node.build_block() {
        Ok(block) => block,
        Err(NodeError::Block(e)) if e.is_recoverable() => {
            debug!(reason = %e, "Nothing to build");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    let id = block.id().map_err(BlockError::from)?;
    node.verify(&id)?;
    node.set_preference(id)?;
    node.accept(&id)?;
    info!(
        height = block.height,
        txs = block.txs.len(),
        block = %hex::encode(&id[..8]),
        "Block accepted"
    );
    Ok(Some(id))
}

pub fn spawn_solo_engine(
    node: Arc<Node>,
    mut from_builder: mpsc::Receiver<EngineMessage>,
) -> JoinHandle<()> {
    let mut shutdown = node.shutdown_signal();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                message = from_builder.recv() => match message {
                    Some(EngineMessage::PendingTxs) => {
                        if let Err(e) = run_round(&node) {
                            warn!(error = %e, "Build round failed");
                        }
                    }
                    None => break,
                },
                _ = shutdown.changed() => break,
            }
        }
        debug!("Solo engine stopped");
    })
}
