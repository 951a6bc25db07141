//! # Node Context
//!
//! One `Node` owns every subsystem of a single ledger node. Several nodes
//! can share a process: each has its own store, event bus and metrics
//! registry.
//!
//! ```text
//!  client ── submit_tx ──▶ Mempool ──▶ Gossiper ──▶ AppSender ──▶ peers
//!                            │
//!  Builder ── PendingTxs ──▶ engine ── build / verify / accept ──▶ Chain
//!                                                                  │
//!                                              Committer ◀─────────┘
//!                                                  │
//!                                   store batch ◀──┴──▶ event bus
//! ```
//!
//! The chain sits behind one mutex: a build, verify or accept pass is the
//! only writer at a time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use al_01_ledger_state::{check_supply_invariant, KeyValueStore, StateError, StateReader, SupplyMismatch};
use al_03_mempool::{Mempool, MempoolApi, MempoolError, SystemTimeSource};
use al_04_gossip::{AppSender, GossipError, Gossiper, ManualGossiper, ProposerGossiper};
use al_05_block_lifecycle::{
    BlockError, Builder, Chain, ChainDependencies, EngineMessage, LifecycleMetrics, ManualBuilder,
    TimeBuilder,
};
use al_06_commit::{CommitError, CommitMetrics, Committer, ReceiptStore};
use ledger_telemetry::{encode_metrics, Registry, TelemetryError};
use parking_lot::Mutex;
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, Subscription};
use shared_types::{
    parse_transaction, unix_now, Address, Asset, AssetId, Block, BlockId, BlockStatus, ErrorKind,
    NodeId, Receipt, Rules, TransactionError, TxId,
};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::adapters::{GossipEnvelope, RoundRobinProposers};
use crate::container::config::NodeConfig;
use crate::genesis::{initialize, Genesis, GenesisError};

/// How often expired and stuck mempool entries are swept.
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(1);

/// Node errors.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Genesis error: {0}")]
    Genesis(#[from] GenesisError),

    #[error("Metrics error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    #[error("Mempool error: {0}")]
    Mempool(#[from] MempoolError),

    #[error("Rejected transaction: {0}")]
    Transaction(#[from] TransactionError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    #[error("Gossip error: {0}")]
    Gossip(#[from] GossipError),
}

impl NodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Block(e) => e.kind(),
            Self::Mempool(e) => e.kind(),
            Self::Transaction(e) => e.kind(),
            Self::State(e) => e.kind(),
            Self::Commit(e) => e.kind(),
            Self::Gossip(e) => e.kind(),
            Self::Genesis(_) | Self::Telemetry(_) => ErrorKind::Validation,
        }
    }
}

pub struct Node {
    node_id: NodeId,
    genesis: Genesis,
    rules: Rules,
    store: Arc<dyn KeyValueStore>,
    mempool: Arc<Mempool>,
    chain: Mutex<Chain>,
    gossiper: Arc<dyn Gossiper>,
    builder: Arc<dyn Builder>,
    time_builder: Option<Arc<TimeBuilder>>,
    bus: Arc<InMemoryEventBus>,
    receipts: Arc<ReceiptStore>,
    registry: Registry,
    accepted_height: Arc<AtomicU64>,
    preferred_height: Arc<AtomicU64>,
    shutdown: watch::Sender<bool>,
}

impl Node {
    /// Builds a node over `store`, writing genesis if the store is empty.
    ///
    /// The returned receiver carries build signals for the consensus
    /// engine. In test mode gossip and builds only happen when triggered;
    /// otherwise gossip follows the round-robin schedule over `validators`
    /// and a timer drives builds.
    pub fn new(
        node_id: NodeId,
        config: &NodeConfig,
        genesis: Genesis,
        store: Arc<dyn KeyValueStore>,
        sender: Arc<dyn AppSender>,
        validators: Vec<NodeId>,
    ) -> Result<(Arc<Self>, mpsc::Receiver<EngineMessage>), NodeError> {
        let rules = genesis.rules()?;
        let registry = Registry::new();
        let bus = Arc::new(InMemoryEventBus::new());

        let committer = Arc::new(Committer::new(
            Arc::clone(&store),
            bus.clone(),
            CommitMetrics::register(&registry)?,
        ));
        let last_accepted = initialize(&genesis, &store, &committer)?;
        let accepted_height = Arc::new(AtomicU64::new(last_accepted.height));
        let preferred_height = Arc::new(AtomicU64::new(last_accepted.height));

        let receipts = Arc::new(ReceiptStore::new(Arc::clone(&store)));
        let mempool = Arc::new(Mempool::new(
            config.mempool.clone(),
            rules.clone(),
            receipts.clone(),
        ));

        let (to_engine, from_builder) = mpsc::channel(1);
        let gossiper: Arc<dyn Gossiper>;
        let builder: Arc<dyn Builder>;
        let mut time_builder = None;
        if config.test_mode {
            gossiper = Arc::new(ManualGossiper::new(
                mempool.clone(),
                sender,
                rules.clone(),
                config.gossip.clone(),
            )) as Arc<dyn Gossiper>;
            builder = Arc::new(ManualBuilder::new(to_engine)) as Arc<dyn Builder>;
        } else {
            let monitor = RoundRobinProposers::new(validators, Arc::clone(&preferred_height));
            let timer = Arc::new(TimeBuilder::new(to_engine, mempool.clone(), &config.builder));
            gossiper = Arc::new(ProposerGossiper::new(
                node_id,
                mempool.clone(),
                sender,
                Arc::new(monitor),
                rules.clone(),
                config.gossip.clone(),
            )) as Arc<dyn Gossiper>;
            builder = timer.clone() as Arc<dyn Builder>;
            time_builder = Some(timer);
        }

        let chain = Chain::new(
            rules.clone(),
            last_accepted,
            ChainDependencies {
                store: Arc::clone(&store),
                mempool: mempool.clone(),
                committed: receipts.clone(),
                committer,
                clock: Arc::new(SystemTimeSource),
                metrics: LifecycleMetrics::register(&registry)?,
            },
        )?;

        let (shutdown, _) = watch::channel(false);
        info!(node = %node_id, test_mode = config.test_mode, "Node created");
        let node = Arc::new(Self {
            node_id,
            genesis,
            rules,
            store,
            mempool,
            chain: Mutex::new(chain),
            gossiper,
            builder,
            time_builder,
            bus,
            receipts,
            registry,
            accepted_height,
            preferred_height,
            shutdown,
        });
        Ok((node, from_builder))
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    // ===== Consensus surface =====

    /// Builds a block on the current preference.
    pub fn build_block(&self) -> Result<Block, NodeError> {
        Ok(self.chain.lock().build_on_preference()?)
    }

    /// Builds a block on `parent`.
    pub fn build_block_on(&self, parent: BlockId) -> Result<Block, NodeError> {
        Ok(self.chain.lock().build_block(parent)?)
    }

    pub fn parse_block(&self, bytes: &[u8]) -> Result<BlockId, NodeError> {
        Ok(self.chain.lock().parse_block(bytes)?)
    }

    pub fn verify(&self, id: &BlockId) -> Result<(), NodeError> {
        Ok(self.chain.lock().verify(id)?)
    }

    pub fn accept(&self, id: &BlockId) -> Result<(), NodeError> {
        let mut chain = self.chain.lock();
        chain.accept(id)?;
        let height = chain.get_block(id)?.height;
        self.accepted_height.store(height, Ordering::SeqCst);
        self.track_preference(&chain);
        Ok(())
    }

    pub fn reject(&self, id: &BlockId) -> Result<(), NodeError> {
        let mut chain = self.chain.lock();
        chain.reject(id)?;
        self.track_preference(&chain);
        Ok(())
    }

    pub fn set_preference(&self, id: BlockId) -> Result<(), NodeError> {
        let mut chain = self.chain.lock();
        chain.set_preference(id)?;
        self.track_preference(&chain);
        Ok(())
    }

    /// The gossip schedule counts builder slots from the preferred tip.
    fn track_preference(&self, chain: &Chain) {
        self.preferred_height
            .store(chain.preferred_height(), Ordering::SeqCst);
    }

    pub fn last_accepted(&self) -> BlockId {
        self.chain.lock().last_accepted()
    }

    pub fn preferred(&self) -> BlockId {
        self.chain.lock().preferred()
    }

    pub fn accepted_height(&self) -> u64 {
        self.accepted_height.load(Ordering::SeqCst)
    }

    pub fn preferred_height(&self) -> u64 {
        self.preferred_height.load(Ordering::SeqCst)
    }

    pub fn get_block(&self, id: &BlockId) -> Result<Block, NodeError> {
        Ok(self.chain.lock().get_block(id)?)
    }

    pub fn block_status(&self, id: &BlockId) -> Result<BlockStatus, NodeError> {
        Ok(self.chain.lock().status(id)?)
    }

    // ===== Peer surface =====

    /// Admits gossiped transactions. Returns how many were admitted.
    pub fn handle_app_gossip(&self, from: NodeId, bytes: &[u8]) -> usize {
        self.gossiper.handle_app_gossip(from, bytes)
    }

    pub fn trigger_gossip(&self) -> Result<usize, NodeError> {
        Ok(self.gossiper.trigger_gossip()?)
    }

    pub fn trigger_build(&self) {
        self.builder.trigger_build();
    }

    /// Feeds inbound gossip from the network into this node until the
    /// queue closes or the node shuts down.
    pub fn spawn_inbound(self: &Arc<Self>, mut inbound: mpsc::Receiver<GossipEnvelope>) -> JoinHandle<()> {
        let node = Arc::clone(self);
        let mut shutdown = self.shutdown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    envelope = inbound.recv() => match envelope {
                        Some(envelope) => {
                            node.handle_app_gossip(envelope.from, &envelope.bytes);
                        }
                        None => break,
                    },
                    _ = shutdown.changed() => break,
                }
            }
            debug!(node = %node.node_id, "Inbound gossip stopped");
        })
    }

    // ===== Client surface =====

    pub fn balance(&self, address: &Address, asset: &AssetId) -> Result<u64, NodeError> {
        Ok(self.store.get_balance(address, asset)?)
    }

    pub fn asset(&self, asset: &AssetId) -> Result<Option<Asset>, NodeError> {
        Ok(self.store.get_asset(asset)?)
    }

    pub fn mempool_len(&self) -> usize {
        self.mempool.len()
    }

    pub fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    /// Validates and admits a client transaction, then hands it to the
    /// gossiper.
    pub fn submit_tx(&self, bytes: &[u8]) -> Result<TxId, NodeError> {
        let tx = parse_transaction(bytes, &self.rules, unix_now())?;
        let id = self.mempool.submit(tx.clone())?;
        self.gossiper.on_admitted(&tx);
        debug!(node = %self.node_id, tx = %hex::encode(&id[..8]), "Client transaction admitted");
        Ok(id)
    }

    pub fn receipt(&self, tx_id: &TxId) -> Result<Option<Receipt>, NodeError> {
        Ok(self.receipts.get_receipt(tx_id)?)
    }

    pub fn subscribe_blocks(&self) -> Subscription {
        self.bus.subscribe(EventFilter::topics(vec![EventTopic::Blocks]))
    }

    pub fn subscribe_decisions(&self) -> Subscription {
        self.bus.subscribe(EventFilter::topics(vec![EventTopic::Decisions]))
    }

    /// Prometheus text exposition of this node's metrics.
    pub fn metrics_text(&self) -> Result<String, NodeError> {
        Ok(encode_metrics(&self.registry)?)
    }

    /// Assets whose balances no longer sum to their supply.
    pub fn check_invariants(&self) -> Result<Vec<SupplyMismatch>, NodeError> {
        Ok(check_supply_invariant(self.store.as_ref())?)
    }

    // ===== Lifecycle =====

    /// Starts the build timer (outside test mode) and mempool maintenance.
    pub fn start(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if let Some(time_builder) = &self.time_builder {
            handles.push(time_builder.spawn());
        }

        let node = Arc::clone(self);
        let mut shutdown = self.shutdown.subscribe();
        handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(MAINTENANCE_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => node.maintain(),
                    _ = shutdown.changed() => break,
                }
            }
        }));
        info!(node = %self.node_id, "Node started");
        handles
    }

    /// Drops expired transactions and returns stuck ones to pending.
    pub fn maintain(&self) {
        let expired = self.mempool.prune_expired(unix_now());
        let restored = self.mempool.restore_timed_out();
        if !expired.is_empty() || !restored.is_empty() {
            debug!(
                node = %self.node_id,
                expired = expired.len(),
                restored = restored.len(),
                "Mempool maintenance"
            );
        }
    }

    /// Resolves once `shutdown` has been called.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        info!(node = %self.node_id, "Node shutting down");
    }
}
