//! # Genesis Module
//!
//! Loads the genesis description and writes the genesis state.
//!
//! ## Initialization Sequence
//!
//! 1. Derive the chain id from the canonical genesis bytes
//! 2. Create the native asset with supply = sum of allocations
//! 3. Credit each allocation
//! 4. Commit the genesis block (height 0) with those writes in one batch
//!
//! A store that already holds a last accepted block is reopened as is.

pub mod builder;

pub use builder::{initialize, Allocation, Genesis, GenesisError};
