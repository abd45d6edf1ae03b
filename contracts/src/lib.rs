//! # Ledgerline Contracts
//!
//! Chaincode that runs on top of `ledgerline-protocol`'s transaction
//! context:
//!
//! - **ERC-20 Token** ([`token_erc20`]): balances, delegated allowances and
//!   issuer-gated mint/burn, with one `Transfer` or `Approval` event per
//!   state change.
//! - **Asset Transfer** ([`asset_transfer`]): a JSON record store with
//!   ownership hand-off.
//!
//! ## Design Principles
//!
//! 1. All monetary arithmetic is checked. `checked_add`/`checked_sub`
//!    everywhere, surfacing [`ContractError::Overflow`](error::ContractError::Overflow).
//! 2. Contracts hold configuration only. Every read and write goes through
//!    the [`TxContext`](ledgerline_protocol::TxContext) of the current call.
//! 3. A method either returns `Ok` with all its writes and its event staged,
//!    or returns `Err` and the caller discards the context.

pub mod asset_transfer;
pub mod error;
pub mod router;
pub mod token_erc20;

pub use asset_transfer::{Asset, AssetContract};
pub use error::{ContractError, ContractResult};
pub use token_erc20::{TokenContract, TokenMethod};
