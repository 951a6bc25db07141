//! # Core Domain Entities
//!
//! Defines the ledger entities shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `Hash`, `Address`, `AssetId`, `TxId`, `BlockId`, `NodeId`
//! - **Transactions**: `Base`, `Action`, `Auth`, `Transaction`
//! - **Execution**: `ExecutionResult`, `Receipt`, `Asset`
//! - **Chain**: `Block`, `BlockStatus`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

use crate::codec::{self, CodecError};

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Account address. Addresses are the signer's Ed25519 public key bytes.
pub type Address = [u8; 32];

/// Identifier of an asset (the id of the transaction that created it).
pub type AssetId = Hash;

/// Identifier of a transaction (hash of its canonical bytes).
pub type TxId = Hash;

/// Identifier of a block (hash of its canonical bytes).
pub type BlockId = Hash;

/// The reserved identifier of the native (fee) asset.
pub const NATIVE_ASSET: AssetId = [0u8; 32];

/// The empty address; owner of the native asset.
pub const EMPTY_ADDRESS: Address = [0u8; 32];

/// Derives the account address of a public key.
pub fn address_of(public_key: &PublicKey) -> Address {
    *public_key
}

/// Computes SHA-256 over a byte slice.
pub fn sha256(bytes: &[u8]) -> Hash {
    Sha256::digest(bytes).into()
}

/// Unique identifier for a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    /// Builds a node id from a short label (handy for tests and local nets).
    pub fn from_label(label: &str) -> Self {
        Self(sha256(label.as_bytes()))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..6]))
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// Fields shared by every transaction regardless of its action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    /// Chain the transaction is valid on.
    pub chain_id: Hash,
    /// Unix timestamp (seconds) the transaction was issued at.
    pub timestamp: i64,
    /// Price paid per consumed unit, in native asset.
    pub unit_price: u64,
}

/// The state transition a transaction requests.
///
/// The variant order is the wire discriminant and must never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Create a new asset owned by the signer.
    CreateAsset {
        /// Opaque metadata, at most `MAX_METADATA_SIZE` bytes.
        metadata: Vec<u8>,
    },
    /// Mint new supply of an asset owned by the signer.
    MintAsset {
        /// Recipient of the minted amount.
        to: Address,
        /// Asset to mint.
        asset: AssetId,
        /// Amount to mint.
        value: u64,
    },
    /// Move an amount of an asset from the signer to `to`.
    Transfer {
        /// Recipient.
        to: Address,
        /// Asset to move.
        asset: AssetId,
        /// Amount to move (zero is allowed).
        value: u64,
    },
}

/// Kind of an action, used for metrics labels and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CreateAsset,
    MintAsset,
    Transfer,
}

impl ActionKind {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAsset => "create_asset",
            Self::MintAsset => "mint_asset",
            Self::Transfer => "transfer",
        }
    }
}

impl Action {
    /// Returns the kind of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CreateAsset { .. } => ActionKind::CreateAsset,
            Self::MintAsset { .. } => ActionKind::MintAsset,
            Self::Transfer { .. } => ActionKind::Transfer,
        }
    }
}

/// Transaction authorization.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Auth {
    /// Ed25519 signature over the transaction digest.
    Ed25519 {
        /// Signer public key.
        signer: PublicKey,
        /// Signature over `Transaction::digest`.
        #[serde_as(as = "Bytes")]
        signature: Signature,
    },
}

impl Auth {
    /// Returns the address that authorized the transaction.
    pub fn signer_address(&self) -> Address {
        match self {
            Self::Ed25519 { signer, .. } => address_of(signer),
        }
    }
}

/// The unsigned part of a transaction; what the signer commits to.
#[derive(Serialize)]
struct UnsignedTransaction<'a> {
    base: &'a Base,
    action: &'a Action,
}

/// Wire form of a transaction.
#[derive(Serialize, Deserialize)]
struct TransactionWire {
    base: Base,
    action: Action,
    auth: Auth,
}

/// An immutable signed transaction.
///
/// The id is computed once from the canonical bytes and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    base: Base,
    action: Action,
    auth: Auth,
    id: TxId,
    size: usize,
}

impl Transaction {
    /// Assembles a transaction from its parts, computing its id.
    pub fn new(base: Base, action: Action, auth: Auth) -> Result<Self, CodecError> {
        let wire = TransactionWire { base, action, auth };
        let bytes = codec::encode(&wire)?;
        Ok(Self::from_wire(wire, &bytes))
    }

    fn from_wire(wire: TransactionWire, bytes: &[u8]) -> Self {
        Self {
            base: wire.base,
            action: wire.action,
            auth: wire.auth,
            id: sha256(bytes),
            size: bytes.len(),
        }
    }

    /// Message covered by the signature.
    pub fn digest(base: &Base, action: &Action) -> Result<Vec<u8>, CodecError> {
        codec::encode(&UnsignedTransaction { base, action })
    }

    /// Decodes a transaction from its canonical bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let wire: TransactionWire = codec::decode(bytes, codec::MAX_TRANSACTION_SIZE)?;
        Ok(Self::from_wire(wire, bytes))
    }

    /// Encodes the transaction to its canonical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(&TransactionWire {
            base: self.base.clone(),
            action: self.action.clone(),
            auth: self.auth.clone(),
        })
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Address of the signer.
    pub fn sender(&self) -> Address {
        self.auth.signer_address()
    }

    /// Size of the canonical encoding in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Serialize for Transaction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TransactionWire {
            base: self.base.clone(),
            action: self.action.clone(),
            auth: self.auth.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = TransactionWire::deserialize(deserializer)?;
        let bytes = codec::encode(&wire).map_err(serde::de::Error::custom)?;
        Ok(Self::from_wire(wire, &bytes))
    }
}

// =============================================================================
// CLUSTER C: EXECUTION
// =============================================================================

/// Outcome of executing one transaction.
///
/// Exactly one is produced per included transaction, in block order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the action succeeded.
    pub success: bool,
    /// Units consumed (charged whether or not the action succeeded).
    pub units: u64,
    /// Empty on success, the error message on failure.
    pub output: Vec<u8>,
}

impl ExecutionResult {
    pub fn success(units: u64) -> Self {
        Self {
            success: true,
            units,
            output: Vec::new(),
        }
    }

    pub fn failure(units: u64, message: impl Into<String>) -> Self {
        Self {
            success: false,
            units,
            output: message.into().into_bytes(),
        }
    }

    /// Output interpreted as UTF-8 (lossy).
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Persisted record of an accepted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Timestamp of the block that accepted the transaction.
    pub timestamp: i64,
    pub success: bool,
    pub units: u64,
}

/// Stored state of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Opaque metadata (stored verbatim, may be empty).
    pub metadata: Vec<u8>,
    /// Total minted amount; equals the sum of all balances.
    pub supply: u64,
    /// Address allowed to mint; `EMPTY_ADDRESS` for the native asset.
    pub owner: Address,
}

// =============================================================================
// CLUSTER D: CHAIN
// =============================================================================

/// A block: an ordered transaction list with its execution results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Id of the parent block.
    pub parent: BlockId,
    /// Height (genesis is 0).
    pub height: u64,
    /// Unix timestamp (seconds).
    pub timestamp: i64,
    /// Transactions in execution order.
    pub txs: Vec<Transaction>,
    /// Results, one per transaction, same order.
    pub results: Vec<ExecutionResult>,
}

impl Block {
    /// The genesis block.
    pub fn genesis() -> Self {
        Self {
            parent: [0u8; 32],
            height: 0,
            timestamp: 0,
            txs: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        codec::decode(bytes, codec::MAX_BLOCK_SIZE)
    }

    /// Block id (hash of the canonical encoding).
    pub fn id(&self) -> Result<BlockId, CodecError> {
        Ok(sha256(&self.to_bytes()?))
    }

    /// Sum of units consumed by the block.
    pub fn units(&self) -> u64 {
        self.results
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.units))
    }
}

/// Lifecycle status of a block.
///
/// ```text
/// [Processing] ──accept──→ [Accepted]
///      │
///      └──────reject──→ [Rejected]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    Processing,
    Accepted,
    Rejected,
}

impl BlockStatus {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}
