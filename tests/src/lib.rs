//! # Asset Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Cluster of test-mode nodes on a channel network
//! └── scenarios/        # Multi-node flows
//!     ├── ledger.rs     # Asset rules observed through blocks
//!     ├── gossip.rs     # Admission and dissemination between nodes
//!     └── lifecycle.rs  # Build, import, verify, accept and reject
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p al-tests
//! cargo test -p al-tests scenarios::gossip::
//! cargo bench -p al-tests
//! ```

pub mod harness;
pub mod scenarios;
