//! # Asset Ledger Node
//!
//! Runs a single development node with an in-memory store.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `AL_CONFIG` | Path to a JSON `NodeConfig` |
//! | `AL_GENESIS` | Path to a JSON `Genesis` |
//! | `AL_NODE_LABEL` | Label the node id is derived from (default `node-0`) |
//!
//! plus the `AL_*` overrides read by `NodeConfig::apply_env`.

use std::path::Path;
use std::sync::Arc;

use al_01_ledger_state::MemoryStore;
use anyhow::{Context, Result};
use ledger_telemetry::{init_logging, TelemetryConfig};
use node_runtime::{spawn_solo_engine, ChannelNetwork, Genesis, Node, NodeConfig};
use shared_types::NodeId;
use tracing::info;

fn read_file(path: &str) -> Result<Vec<u8>> {
    std::fs::read(Path::new(path)).with_context(|| format!("reading {}", path))
}

fn load_config() -> Result<NodeConfig> {
    let mut config = match std::env::var("AL_CONFIG") {
        Ok(path) => NodeConfig::from_json(&read_file(&path)?)?,
        Err(_) => NodeConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

fn load_genesis() -> Result<Genesis> {
    match std::env::var("AL_GENESIS") {
        Ok(path) => Ok(Genesis::from_json(&read_file(&path)?)?),
        Err(_) => Ok(Genesis::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    let label = std::env::var("AL_NODE_LABEL").unwrap_or_else(|_| "node-0".to_string());
    let mut telemetry = TelemetryConfig::for_node(&label);
    telemetry.log_level = config.log_level.clone();
    init_logging(&telemetry)?;

    let genesis = load_genesis()?;
    info!(
        chain_id = %hex::encode(genesis.chain_id()?),
        symbol = %genesis.symbol,
        "Loaded genesis"
    );

    let node_id = NodeId::from_label(&label);
    let network = ChannelNetwork::new(config.network.inbound_queue_size);
    let inbound = network.join(node_id);
    let (node, from_builder) = Node::new(
        node_id,
        &config,
        genesis,
        Arc::new(MemoryStore::new()),
        Arc::new(network.sender_for(node_id)),
        vec![node_id],
    )?;

    let mut handles = node.start();
    handles.push(node.spawn_inbound(inbound));
    handles.push(spawn_solo_engine(Arc::clone(&node), from_builder));

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    node.shutdown();
    for handle in handles {
        handle.abort();
    }
    Ok(())
}
