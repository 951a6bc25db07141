//! # Shared Bus - Ledger Event Feeds
//!
//! Broadcast bus carrying accepted blocks and per-transaction decisions to
//! any number of subscribers.
//!
//! ```text
//! ┌──────────────┐   publish()   ┌──────────────┐  subscribe()  ┌────────────┐
//! │  Committer   │ ────────────→ │  Event Bus   │ ────────────→ │ Subscriber │
//! └──────────────┘               └──────────────┘               └────────────┘
//! ```
//!
//! ## Delivery
//!
//! - Each subscriber has a bounded buffer of `capacity` events.
//! - Publishing never blocks; a slow subscriber loses its oldest events.
//! - Events published before a subscription exists are never delivered to it.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
