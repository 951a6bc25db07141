//! Gossip wire message: a list of canonically encoded transactions.

use shared_types::{codec, CodecError, Transaction};

use crate::domain::GossipError;

/// Bytes bincode spends on each length prefix.
const LENGTH_PREFIX: u64 = 8;

/// A batch of encoded transactions as sent between peers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GossipMessage {
    pub txs: Vec<Vec<u8>>,
}

impl GossipMessage {
    pub fn from_transactions(txs: &[Transaction]) -> Result<Self, CodecError> {
        let txs = txs
            .iter()
            .map(Transaction::to_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { txs })
    }

    /// Packs transactions in order until the encoded message would exceed
    /// `limit` bytes.
    pub fn pack(txs: &[Transaction], limit: u64) -> Result<Self, CodecError> {
        let mut size = LENGTH_PREFIX;
        let mut packed = Vec::new();
        for tx in txs {
            size = size.saturating_add(LENGTH_PREFIX + tx.size() as u64);
            if size > limit {
                break;
            }
            packed.push(tx.to_bytes()?);
        }
        Ok(Self { txs: packed })
    }

    pub fn encode(&self) -> Result<Vec<u8>, GossipError> {
        Ok(codec::encode(&self.txs)?)
    }

    /// Decodes a message no larger than `limit` bytes.
    pub fn decode(bytes: &[u8], limit: u64) -> Result<Self, GossipError> {
        Ok(Self {
            txs: codec::decode(bytes, limit)?,
        })
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }
}
