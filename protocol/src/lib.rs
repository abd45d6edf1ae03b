// Copyright (c) 2026 Ledgerline Contributors. MIT License.
// See LICENSE for details.

//! # Ledgerline Protocol: Chaincode Execution Substrate
//!
//! Everything a contract needs to run that isn't the contract itself.
//! Contracts are plain Rust methods that take a [`TxContext`]; this crate
//! supplies the context and the collaborators behind it.
//!
//! ## Architecture
//!
//! - **storage**: The versioned world state (`WorldState` trait, in-memory
//!   and sled backends) and composite-key encoding.
//! - **transaction**: Per-invocation context with buffered reads and
//!   writes, optimistic commit, and the `Ledger` that drives it.
//! - **identity**: The resolved caller: account id and organization.
//! - **events**: Post-commit event publication.
//! - **config**: World-state layout constants and token configuration.
//! - **logging**: `tracing` subscriber setup for hosts.
//!
//! ## Design Philosophy
//!
//! 1. Contracts never see a database handle, only a transaction.
//! 2. Nothing a transaction does is visible until it commits, and a commit
//!    either lands completely or not at all.
//! 3. Collaborators are traits, so tests run against memory and production
//!    runs against disk with the same contract code.

pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod logging;
pub mod storage;
pub mod transaction;

pub use error::{LedgerError, LedgerResult};
pub use events::{ChaincodeEvent, EventSink, LogSink, RecordingSink};
pub use identity::{ClientIdentity, StaticIdentity};
pub use storage::{MemoryState, SledState, WorldState};
pub use transaction::{Ledger, TxContext, TxReceipt};
