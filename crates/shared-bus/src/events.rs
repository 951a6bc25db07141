//! # Ledger Events
//!
//! Defines every event that flows through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Block, BlockId, ExecutionResult, TxId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerEvent {
    // =========================================================================
    // BLOCK FEED
    // =========================================================================
    /// A block was accepted and its results committed.
    BlockAccepted {
        /// Id of the accepted block.
        id: BlockId,
        /// The block, including its results.
        block: Block,
    },

    // =========================================================================
    // DECISION FEED
    // =========================================================================
    /// A transaction reached a final decision.
    TransactionDecided {
        /// Id of the decided transaction.
        id: TxId,
        /// Set when the transaction was dropped without executing.
        error: Option<String>,
        /// Execution result, present when the transaction was included.
        result: Option<ExecutionResult>,
    },
}

impl LedgerEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockAccepted { .. } => EventTopic::Blocks,
            Self::TransactionDecided { .. } => EventTopic::Decisions,
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// All events (no filtering).
    All,
    /// Accepted blocks.
    Blocks,
    /// Per-transaction decisions.
    Decisions,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
