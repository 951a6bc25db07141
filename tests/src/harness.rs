//! Multi-node harness.
//!
//! Nodes run in test mode and gossip is delivered by hand, so every step of
//! a scenario happens in a known order.

use std::sync::Arc;

use al_01_ledger_state::MemoryStore;
use al_05_block_lifecycle::EngineMessage;
use node_runtime::{Allocation, ChannelNetwork, Genesis, GossipEnvelope, Node, NodeConfig};
use shared_types::{
    unix_now, Action, Address, Base, Block, BlockId, BlockStatus, ExecutionResult, KeyPair, NodeId,
    Transaction, NATIVE_ASSET,
};
use tokio::sync::mpsc;

/// Native balance of every funded account.
pub const FUNDS: u64 = 10_000_000;

pub struct TestNode {
    pub node: Arc<Node>,
    pub inbox: mpsc::Receiver<GossipEnvelope>,
    pub to_engine: mpsc::Receiver<EngineMessage>,
}

pub struct Cluster {
    pub network: Arc<ChannelNetwork>,
    pub nodes: Vec<TestNode>,
    pub genesis: Genesis,
    /// Funded accounts, derived from fixed seeds.
    pub accounts: Vec<KeyPair>,
}

pub fn account(seed: u8) -> KeyPair {
    KeyPair::from_seed([seed; 32])
}

impl Cluster {
    /// `nodes` test-mode nodes sharing one genesis that funds `accounts`
    /// accounts with `FUNDS` each.
    pub fn new(nodes: usize, accounts: usize) -> Self {
        let accounts: Vec<KeyPair> = (1..=accounts as u8).map(account).collect();
        let genesis = Genesis {
            custom_allocation: accounts
                .iter()
                .map(|key| Allocation {
                    address: hex::encode(key.address()),
                    balance: FUNDS,
                })
                .collect(),
            ..Genesis::default()
        };
        let network = ChannelNetwork::new(64);
        let config = NodeConfig {
            test_mode: true,
            ..NodeConfig::default()
        };
        let ids: Vec<NodeId> = (0..nodes)
            .map(|i| NodeId::from_label(&format!("node-{}", i)))
            .collect();

        let nodes = ids
            .iter()
            .map(|id| {
                let inbox = network.join(*id);
                let (node, to_engine) = Node::new(
                    *id,
                    &config,
                    genesis.clone(),
                    Arc::new(MemoryStore::new()),
                    Arc::new(network.sender_for(*id)),
                    ids.clone(),
                )
                .expect("node construction");
                TestNode {
                    node,
                    inbox,
                    to_engine,
                }
            })
            .collect();

        Self {
            network,
            nodes,
            genesis,
            accounts,
        }
    }

    pub fn node(&self, i: usize) -> &Arc<Node> {
        &self.nodes[i].node
    }

    /// Hands every queued gossip message of node `i` to it. Returns the
    /// number of admitted transactions.
    pub fn deliver(&mut self, i: usize) -> usize {
        let mut admitted = 0;
        while let Ok(envelope) = self.nodes[i].inbox.try_recv() {
            admitted += self.nodes[i].node.handle_app_gossip(envelope.from, &envelope.bytes);
        }
        admitted
    }

    pub fn sign(&self, key: &KeyPair, action: Action) -> Transaction {
        self.sign_at(key, action, unix_now())
    }

    pub fn sign_at(&self, key: &KeyPair, action: Action, timestamp: i64) -> Transaction {
        key.sign_transaction(
            Base {
                chain_id: self.node(0).rules().chain_id,
                timestamp,
                unit_price: 1,
            },
            action,
        )
        .expect("signing")
    }

    /// Submits to node `i`.
    pub fn submit(&self, i: usize, tx: &Transaction) -> shared_types::TxId {
        self.node(i)
            .submit_tx(&tx.to_bytes().expect("encoding"))
            .expect("submission")
    }

    /// Trigger build on node `i`, wait for the engine signal, then build,
    /// verify, prefer and accept the block.
    pub fn expect_block(&mut self, i: usize) -> Block {
        let node = Arc::clone(self.node(i));
        node.trigger_build();
        assert_eq!(
            self.nodes[i].to_engine.try_recv().expect("build signal"),
            EngineMessage::PendingTxs
        );

        let block = node.build_block().expect("build");
        let id = block.id().expect("block id");
        node.verify(&id).expect("verify");
        assert_eq!(node.block_status(&id).expect("status"), BlockStatus::Processing);
        node.set_preference(id).expect("preference");
        node.accept(&id).expect("accept");
        assert_eq!(node.block_status(&id).expect("status"), BlockStatus::Accepted);
        assert_eq!(node.last_accepted(), id);
        block
    }

    /// Imports `block` into node `i`, verifies and accepts it.
    pub fn import(&self, i: usize, block: &Block) -> BlockId {
        let node = self.node(i);
        let id = node
            .parse_block(&block.to_bytes().expect("encoding"))
            .expect("parse");
        node.verify(&id).expect("verify");
        node.set_preference(id).expect("preference");
        node.accept(&id).expect("accept");
        id
    }

    pub fn native_balance(&self, i: usize, address: &Address) -> u64 {
        self.node(i)
            .balance(address, &NATIVE_ASSET)
            .expect("balance")
    }

    /// Asserts that every node's supply invariant holds.
    pub fn assert_supply_invariant(&self) {
        for test_node in &self.nodes {
            assert!(
                test_node.node.check_invariants().expect("invariant scan").is_empty(),
                "supply invariant broken on {}",
                test_node.node.node_id()
            );
        }
    }
}

/// The single result of a one-transaction block.
pub fn only_result(block: &Block) -> &ExecutionResult {
    assert_eq!(block.results.len(), 1);
    &block.results[0]
}
