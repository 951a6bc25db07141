//! Build triggers.
//!
//! A builder never builds by itself: it tells the consensus engine that
//! transactions are waiting, and the engine calls `Chain::build_block`.
//! The engine channel has room for one message, so repeated signals
//! before the engine reacts collapse into one.

use std::sync::Arc;
use std::time::Duration;

use al_03_mempool::MempoolApi;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::BuilderConfig;

/// Messages from the ledger to the consensus engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage {
    /// Transactions are ready to be built into a block.
    PendingTxs,
}

/// Something that can ask the engine for a block.
pub trait Builder: Send + Sync {
    fn trigger_build(&self);
}

/// Returns false once the engine is gone.
fn signal(to_engine: &mpsc::Sender<EngineMessage>) -> bool {
    match to_engine.try_send(EngineMessage::PendingTxs) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            debug!("Build signal already pending");
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

/// Signals only when told to. Used in test mode.
pub struct ManualBuilder {
    to_engine: mpsc::Sender<EngineMessage>,
}

impl ManualBuilder {
    pub fn new(to_engine: mpsc::Sender<EngineMessage>) -> Self {
        Self { to_engine }
    }
}

impl Builder for ManualBuilder {
    fn trigger_build(&self) {
        if !signal(&self.to_engine) {
            warn!("Engine channel closed, build signal dropped");
        }
    }
}

/// Signals on a timer whenever the mempool is non-empty.
///
/// `trigger_build` signals at once and restarts the timer.
pub struct TimeBuilder {
    to_engine: mpsc::Sender<EngineMessage>,
    mempool: Arc<dyn MempoolApi>,
    interval: Duration,
    notify: Notify,
}

impl TimeBuilder {
    pub fn new(
        to_engine: mpsc::Sender<EngineMessage>,
        mempool: Arc<dyn MempoolApi>,
        config: &BuilderConfig,
    ) -> Self {
        Self {
            to_engine,
            mempool,
            interval: Duration::from_millis(config.build_interval_ms),
            notify: Notify::new(),
        }
    }

    /// Runs the timer loop until the engine channel closes.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run().await })
    }

    async fn run(&self) {
        loop {
            if self.to_engine.is_closed() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    if self.mempool.is_empty() {
                        continue;
                    }
                }
                _ = self.notify.notified() => {}
            }
            if !signal(&self.to_engine) {
                break;
            }
        }
        debug!("Time builder stopped");
    }
}

impl Builder for TimeBuilder {
    fn trigger_build(&self) {
        self.notify.notify_one();
    }
}
