//! The block arena.
//!
//! `Chain` is not internally synchronized: the node wraps it in one mutex
//! so that a build, verify or accept pass is the only writer at a time.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use al_01_ledger_state::{keys, ChangeSet, KeyValueStore, StateView};
use al_02_action_executor::{execute_transaction, ExecutionError};
use al_03_mempool::{CommittedTransactions, MempoolApi, TimeSource};
use ledger_telemetry::HistogramTimer;
use shared_types::{
    validate_transaction, Block, BlockId, BlockStatus, ExecutionResult, Rules, Transaction, TxId,
    MAX_FUTURE_SKEW_SECS,
};
use tracing::{debug, info, warn};

use crate::domain::entry::BlockEntry;
use crate::error::BlockError;
use crate::metrics::LifecycleMetrics;
use crate::ports::BlockCommitter;

/// Collaborators of the chain.
pub struct ChainDependencies {
    pub store: Arc<dyn KeyValueStore>,
    pub mempool: Arc<dyn MempoolApi>,
    pub committed: Arc<dyn CommittedTransactions>,
    pub committer: Arc<dyn BlockCommitter>,
    pub clock: Arc<dyn TimeSource>,
    pub metrics: LifecycleMetrics,
}

/// State layered under a block: the change sets and transaction ids of its
/// processing ancestors.
struct Ancestry {
    change_sets: Vec<Arc<ChangeSet>>,
    tx_ids: HashSet<TxId>,
}

/// What a build pass does with one mempool candidate.
enum Candidate {
    Include(ExecutionResult),
    /// Stays pending inclusion under a processing ancestor.
    Held,
    /// Leaves the mempool.
    Drop,
}

fn short(id: &BlockId) -> String {
    hex::encode(&id[..8])
}

pub struct Chain {
    blocks: HashMap<BlockId, BlockEntry>,
    last_accepted: BlockId,
    preferred: BlockId,
    rules: Rules,
    store: Arc<dyn KeyValueStore>,
    mempool: Arc<dyn MempoolApi>,
    committed: Arc<dyn CommittedTransactions>,
    committer: Arc<dyn BlockCommitter>,
    clock: Arc<dyn TimeSource>,
    metrics: LifecycleMetrics,
}

impl Chain {
    /// Creates a chain whose last accepted block is `last_accepted`, which
    /// must already be durable in the store.
    pub fn new(rules: Rules, last_accepted: Block, deps: ChainDependencies) -> Result<Self, BlockError> {
        let id = last_accepted.id()?;
        let mut blocks = HashMap::new();
        blocks.insert(id, BlockEntry::accepted(id, last_accepted));
        info!(last_accepted = %short(&id), "Chain initialized");
        Ok(Self {
            blocks,
            last_accepted: id,
            preferred: id,
            rules,
            store: deps.store,
            mempool: deps.mempool,
            committed: deps.committed,
            committer: deps.committer,
            clock: deps.clock,
            metrics: deps.metrics,
        })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn last_accepted(&self) -> BlockId {
        self.last_accepted
    }

    pub fn preferred(&self) -> BlockId {
        self.preferred
    }

    /// Height of the preferred block, which the next local build extends.
    pub fn preferred_height(&self) -> u64 {
        self.blocks
            .get(&self.preferred)
            .map_or(0, |entry| entry.block.height)
    }

    /// Number of blocks awaiting a decision.
    pub fn processing_count(&self) -> usize {
        self.blocks.values().filter(|e| e.is_processing()).count()
    }

    pub fn entry(&self, id: &BlockId) -> Option<&BlockEntry> {
        self.blocks.get(id)
    }

    /// Looks a block up in the arena, then among durable accepted blocks.
    pub fn get_block(&self, id: &BlockId) -> Result<Block, BlockError> {
        if let Some(entry) = self.blocks.get(id) {
            return Ok(entry.block.clone());
        }
        match self.store.get(&keys::block_key(id))? {
            Some(bytes) => Ok(Block::from_bytes(&bytes)?),
            None => Err(BlockError::NotFound(short(id))),
        }
    }

    pub fn status(&self, id: &BlockId) -> Result<BlockStatus, BlockError> {
        if let Some(entry) = self.blocks.get(id) {
            return Ok(entry.status);
        }
        if self.store.has(&keys::block_key(id))? {
            return Ok(BlockStatus::Accepted);
        }
        Err(BlockError::NotFound(short(id)))
    }

    fn now(&self) -> i64 {
        (self.clock.now() / 1000) as i64
    }

    fn is_committed(&self, id: &TxId) -> Result<bool, BlockError> {
        self.committed.is_committed(id).map_err(BlockError::History)
    }

    fn refresh_processing_gauge(&self) {
        self.metrics.processing.set(self.processing_count() as i64);
    }

    /// Walks from `parent` back to the last accepted block.
    fn ancestry(&self, parent: &BlockId) -> Result<Ancestry, BlockError> {
        let mut change_sets = Vec::new();
        let mut tx_ids = HashSet::new();
        let mut cursor = *parent;
        while cursor != self.last_accepted {
            let entry = self
                .blocks
                .get(&cursor)
                .ok_or_else(|| BlockError::UnknownParent(short(&cursor)))?;
            if !entry.is_processing() {
                return Err(BlockError::InvalidParent(format!(
                    "ancestor {} is {:?}",
                    short(&cursor),
                    entry.status
                )));
            }
            let changes = entry.change_set.clone().ok_or_else(|| {
                BlockError::InvalidParent(format!("ancestor {} is not verified", short(&cursor)))
            })?;
            change_sets.push(changes);
            tx_ids.extend(entry.block.txs.iter().map(Transaction::id));
            cursor = entry.block.parent;
        }
        change_sets.reverse();
        Ok(Ancestry { change_sets, tx_ids })
    }

    // =========================================================================
    // BUILD
    // =========================================================================

    pub fn build_on_preference(&mut self) -> Result<Block, BlockError> {
        self.build_block(self.preferred)
    }

    /// Builds a block on `parent_id` from pending mempool transactions.
    ///
    /// Transactions that are invalid, already committed, or cannot pay
    /// their fee are dropped from the mempool. Those a processing ancestor
    /// includes stay pending inclusion. Transactions whose action fails are
    /// included with a failed result.
    pub fn build_block(&mut self, parent_id: BlockId) -> Result<Block, BlockError> {
        let parent = self
            .blocks
            .get(&parent_id)
            .ok_or_else(|| BlockError::UnknownParent(short(&parent_id)))?;
        if parent_id != self.last_accepted && !(parent.is_processing() && parent.verified) {
            return Err(BlockError::InvalidParent(short(&parent_id)));
        }
        let (parent_height, parent_timestamp) = (parent.block.height, parent.block.timestamp);
        if self
            .blocks
            .values()
            .any(|e| e.built_locally && e.is_processing() && e.block.parent == parent_id)
        {
            return Err(BlockError::AlreadyBuilt(short(&parent_id)));
        }
        let ancestry = self.ancestry(&parent_id)?;

        let height = parent_height + 1;
        let timestamp = self.now().max(parent_timestamp);
        let candidates = self
            .mempool
            .pop_n(self.rules.max_block_txs, self.rules.max_block_units, height);
        if candidates.is_empty() {
            return Err(BlockError::NoTransactions);
        }
        let popped: Vec<TxId> = candidates.iter().map(Transaction::id).collect();

        let mut view = StateView::with_parents(self.store.clone(), ancestry.change_sets);
        let mut seen = ancestry.tx_ids;
        let mut txs = Vec::new();
        let mut results = Vec::new();
        let mut dropped = Vec::new();
        for tx in candidates {
            match self.include(&tx, timestamp, &mut seen, &mut view) {
                Ok(Candidate::Include(result)) => {
                    txs.push(tx);
                    results.push(result);
                }
                Ok(Candidate::Held) => {}
                Ok(Candidate::Drop) => dropped.push(tx.id()),
                Err(e) => {
                    self.mempool.restore(&popped);
                    return Err(e);
                }
            }
        }
        if !dropped.is_empty() {
            let removed = self.mempool.remove(&dropped);
            debug!(removed, "Dropped unincludable transactions");
        }
        if txs.is_empty() {
            return Err(BlockError::NoTransactions);
        }

        let block = Block {
            parent: parent_id,
            height,
            timestamp,
            txs,
            results,
        };
        let id = match block.id() {
            Ok(id) => id,
            Err(e) => {
                self.mempool.restore(&popped);
                return Err(e.into());
            }
        };
        info!(
            block = %short(&id),
            height,
            txs = block.txs.len(),
            units = block.units(),
            "Built block"
        );
        self.blocks
            .insert(id, BlockEntry::built(id, block.clone(), view.into_change_set()));
        self.metrics.blocks_built.inc();
        self.refresh_processing_gauge();
        Ok(block)
    }

    /// Executes one candidate.
    fn include(
        &self,
        tx: &Transaction,
        timestamp: i64,
        seen: &mut HashSet<TxId>,
        view: &mut StateView,
    ) -> Result<Candidate, BlockError> {
        let id = hex::encode(tx.id());
        if let Err(e) = validate_transaction(tx, &self.rules, timestamp) {
            debug!(tx = %id, error = %e, "Skipping invalid transaction");
            return Ok(Candidate::Drop);
        }
        if self.is_committed(&tx.id())? {
            debug!(tx = %id, "Skipping committed transaction");
            return Ok(Candidate::Drop);
        }
        if !seen.insert(tx.id()) {
            // A processing ancestor holds it; its decision settles the entry.
            debug!(tx = %id, "Skipping transaction held by an ancestor");
            return Ok(Candidate::Held);
        }
        match execute_transaction(tx, &self.rules, view) {
            Ok(result) => Ok(Candidate::Include(result)),
            Err(ExecutionError::State(e)) => Err(e.into()),
            Err(e) => {
                debug!(tx = %id, error = %e, "Skipping unexecutable transaction");
                Ok(Candidate::Drop)
            }
        }
    }

    /// Ids from `tx_ids` that no processing block other than `except`
    /// includes.
    fn unclaimed(&self, except: &BlockId, tx_ids: &[TxId]) -> Vec<TxId> {
        let claimed: HashSet<TxId> = self
            .blocks
            .values()
            .filter(|e| e.id != *except && e.is_processing())
            .flat_map(|e| e.block.txs.iter().map(Transaction::id))
            .collect();
        tx_ids
            .iter()
            .filter(|id| !claimed.contains(*id))
            .copied()
            .collect()
    }

    // =========================================================================
    // PARSE / VERIFY
    // =========================================================================

    /// Decodes a block received from a peer and tracks it as processing.
    pub fn parse_block(&mut self, bytes: &[u8]) -> Result<BlockId, BlockError> {
        let block = Block::from_bytes(bytes)?;
        let id = block.id()?;
        if self.blocks.contains_key(&id) || self.store.has(&keys::block_key(&id))? {
            return Ok(id);
        }
        debug!(block = %short(&id), height = block.height, "Parsed block");
        self.blocks.insert(id, BlockEntry::parsed(id, block));
        self.refresh_processing_gauge();
        Ok(id)
    }

    /// Re-executes a block and checks it against its embedded results.
    ///
    /// A block that fails stays unverified and can never be accepted.
    pub fn verify(&mut self, id: &BlockId) -> Result<(), BlockError> {
        let Some(entry) = self.blocks.get(id) else {
            // Accepted blocks below the tip only live in the store.
            if self.store.has(&keys::block_key(id))? {
                return Ok(());
            }
            return Err(BlockError::NotFound(short(id)));
        };
        match entry.status {
            BlockStatus::Accepted => return Ok(()),
            BlockStatus::Rejected => {
                return Err(BlockError::Verification("block was rejected".into()))
            }
            BlockStatus::Processing if entry.verified => return Ok(()),
            BlockStatus::Processing => {}
        }
        let block = entry.block.clone();

        let outcome = {
            let _timer = HistogramTimer::new(&self.metrics.verify_duration);
            self.check_block(&block)
        };
        match outcome {
            Ok(changes) => {
                if let Some(entry) = self.blocks.get_mut(id) {
                    entry.change_set = Some(Arc::new(changes));
                    entry.verified = true;
                }
                info!(block = %short(id), height = block.height, txs = block.txs.len(), "Verified block");
                Ok(())
            }
            Err(e) => {
                self.metrics.verify_failures.inc();
                warn!(block = %short(id), height = block.height, error = %e, "Block failed verification");
                Err(e)
            }
        }
    }

    fn check_block(&self, block: &Block) -> Result<ChangeSet, BlockError> {
        let fail = |reason: String| Err(BlockError::Verification(reason));

        let Some(parent) = self.blocks.get(&block.parent) else {
            return fail(format!("unknown parent {}", short(&block.parent)));
        };
        if parent.status == BlockStatus::Rejected {
            return fail("parent was rejected".into());
        }
        if block.height != parent.block.height + 1 {
            return fail(format!(
                "height {} does not follow parent height {}",
                block.height, parent.block.height
            ));
        }
        if block.timestamp < parent.block.timestamp {
            return fail("timestamp before parent".into());
        }
        if block.timestamp > self.now().saturating_add(MAX_FUTURE_SKEW_SECS) {
            return fail("timestamp too far in the future".into());
        }
        if block.txs.is_empty() {
            return fail("empty block".into());
        }
        if block.txs.len() != block.results.len() {
            return fail(format!(
                "{} transactions but {} results",
                block.txs.len(),
                block.results.len()
            ));
        }
        if block.txs.len() > self.rules.max_block_txs {
            return fail("too many transactions".into());
        }
        let units = block
            .txs
            .iter()
            .fold(0u64, |acc, tx| acc.saturating_add(self.rules.units(tx.action())));
        if units > self.rules.max_block_units {
            return fail(format!("{} units exceed the block limit", units));
        }

        let ancestry = self.ancestry(&block.parent).map_err(|e| match e {
            BlockError::UnknownParent(_) | BlockError::InvalidParent(_) => {
                BlockError::Verification(e.to_string())
            }
            other => other,
        })?;
        let mut view = StateView::with_parents(self.store.clone(), ancestry.change_sets);
        let mut seen = ancestry.tx_ids;
        for (index, (tx, expected)) in block.txs.iter().zip(&block.results).enumerate() {
            if let Err(e) = validate_transaction(tx, &self.rules, block.timestamp) {
                return fail(format!("transaction {}: {}", index, e));
            }
            if !seen.insert(tx.id()) || self.is_committed(&tx.id())? {
                return fail(format!("transaction {} is a duplicate", index));
            }
            let result = match execute_transaction(tx, &self.rules, &mut view) {
                Ok(result) => result,
                Err(ExecutionError::State(e)) => return Err(e.into()),
                Err(e) => return fail(format!("transaction {} not executable: {}", index, e)),
            };
            if &result != expected {
                return fail(format!("result mismatch at transaction {}", index));
            }
        }
        Ok(view.into_change_set())
    }

    // =========================================================================
    // DECISIONS
    // =========================================================================

    /// Marks which block new blocks should be built on.
    pub fn set_preference(&mut self, id: BlockId) -> Result<(), BlockError> {
        let entry = self
            .blocks
            .get(&id)
            .ok_or_else(|| BlockError::NotFound(short(&id)))?;
        if id != self.last_accepted && !entry.is_processing() {
            return Err(BlockError::InvalidPreference(format!(
                "{} is {:?}",
                short(&id),
                entry.status
            )));
        }
        if self.preferred != id {
            debug!(block = %short(&id), "Preference updated");
        }
        self.preferred = id;
        Ok(())
    }

    /// Commits a verified block whose parent is the last accepted block.
    pub fn accept(&mut self, id: &BlockId) -> Result<(), BlockError> {
        if *id == self.last_accepted {
            return Ok(());
        }
        let Some(entry) = self.blocks.get(id) else {
            if self.store.has(&keys::block_key(id))? {
                return Err(BlockError::ConsensusSequence(format!(
                    "{} was accepted earlier",
                    short(id)
                )));
            }
            return Err(BlockError::NotFound(short(id)));
        };
        if entry.status == BlockStatus::Rejected {
            return Err(BlockError::ConsensusSequence(format!(
                "{} was rejected",
                short(id)
            )));
        }
        if !entry.verified {
            return Err(BlockError::NotVerified);
        }
        if entry.block.parent != self.last_accepted {
            return Err(BlockError::ConsensusSequence(format!(
                "parent {} is not the last accepted block {}",
                short(&entry.block.parent),
                short(&self.last_accepted)
            )));
        }
        let changes = entry.change_set.clone().ok_or(BlockError::NotVerified)?;
        let block = entry.block.clone();

        self.committer
            .commit(id, &block, &changes)
            .map_err(|e| BlockError::Commit(e.to_string()))?;

        let previous = std::mem::replace(&mut self.last_accepted, *id);
        if let Some(entry) = self.blocks.get_mut(id) {
            entry.status = BlockStatus::Accepted;
            entry.change_set = None;
        }
        if self.preferred == previous {
            self.preferred = *id;
        }
        let tx_ids: Vec<TxId> = block.txs.iter().map(Transaction::id).collect();
        self.mempool.remove(&tx_ids);

        // The previous tip is durable now; rejected blocks are dead.
        self.blocks.remove(&previous);
        self.blocks.retain(|_, e| e.status != BlockStatus::Rejected);

        self.metrics.blocks_accepted.inc();
        self.refresh_processing_gauge();
        info!(block = %short(id), height = block.height, txs = tx_ids.len(), "Accepted block");
        Ok(())
    }

    /// Discards a processing block and returns its transactions to the
    /// mempool.
    pub fn reject(&mut self, id: &BlockId) -> Result<(), BlockError> {
        let entry = match self.blocks.get_mut(id) {
            Some(entry) => entry,
            None if self.store.has(&keys::block_key(id))? => {
                return Err(BlockError::ConsensusSequence(format!(
                    "{} was accepted",
                    short(id)
                )))
            }
            None => return Err(BlockError::NotFound(short(id))),
        };
        match entry.status {
            BlockStatus::Rejected => return Ok(()),
            BlockStatus::Accepted => {
                return Err(BlockError::ConsensusSequence(format!(
                    "{} was accepted",
                    short(id)
                )))
            }
            BlockStatus::Processing => {}
        }
        entry.status = BlockStatus::Rejected;
        entry.change_set = None;
        let tx_ids: Vec<TxId> = entry.block.txs.iter().map(Transaction::id).collect();
        let height = entry.block.height;

        let restored = self.mempool.restore(&self.unclaimed(id, &tx_ids));
        if self.preferred == *id {
            self.preferred = self.last_accepted;
        }
        self.metrics.blocks_rejected.inc();
        self.refresh_processing_gauge();
        info!(block = %short(id), height, restored, "Rejected block");
        Ok(())
    }
}
