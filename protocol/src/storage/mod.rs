//! # Storage Module
//!
//! The world state chaincode executes against, and the helpers that shape
//! its keys.
//!
//! ## Architecture
//!
//! ```text
//! world_state.rs — WorldState trait, versioned values, read/write sets
//! memory.rs      — In-memory backend (parking_lot RwLock over a BTreeMap)
//! db.rs          — sled backend with one tree per chaincode namespace
//! composite.rs   — Injective multi-field key encoding
//! ```
//!
//! Contracts never hold a store reference of their own. They receive one
//! through the per-transaction [`TxContext`](crate::transaction::TxContext),
//! which is what lets tests swap in [`MemoryState`] without touching the
//! contract code.

pub mod composite;
pub mod db;
pub mod memory;
pub mod world_state;

pub use composite::{create_composite_key, partial_key_range, split_composite_key};
pub use db::SledState;
pub use memory::MemoryState;
pub use world_state::{
    RangeIter, ReadSet, StoreError, StoreResult, Version, Versioned, WorldState, WriteBatch,
    WriteOp,
};
