//! # Transaction Module
//!
//! One contract invocation is one transaction:
//!
//! ```text
//! Ledger::submit ─► TxContext (identity, read set, write set, event)
//!                       │
//!                       ▼
//!                 contract method
//!                       │
//!               Ok ─────┴───── Err
//!               ▼               ▼
//!      commit (MVCC check)   discard
//! ```
//!
//! The contract reads and writes only through the context, so everything it
//! does in one call lands in a single conflict-detection unit.

pub mod context;
pub mod ledger;

pub use context::{StateIter, TxContext, TxReceipt};
pub use ledger::Ledger;
