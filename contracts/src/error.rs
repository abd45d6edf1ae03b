//! Errors returned by contract operations.
//!
//! Every failure aborts the invocation. Nothing here is retried and no
//! partial state survives: the transaction context only commits when the
//! operation returns `Ok`.

use ledgerline_protocol::storage::StoreError;
use ledgerline_protocol::LedgerError;
use thiserror::Error;

/// Errors that can occur while executing a contract method.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Malformed or out-of-range input: non-positive amount, identical
    /// sender and recipient, wrong argument count.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A balance was read for an account that was never credited.
    #[error("the account {0} does not exist")]
    AccountNotFound(String),

    /// The debited account cannot cover the amount.
    #[error("account {account} has insufficient funds: balance {balance}, needs {amount}")]
    InsufficientFunds {
        account: String,
        balance: i64,
        amount: i64,
    },

    /// The spender's allowance does not permit the delegated transfer.
    #[error(
        "spender {spender} does not have enough allowance from {owner}: allowance {allowance}, requested {amount}"
    )]
    InsufficientAllowance {
        owner: String,
        spender: String,
        allowance: i64,
        amount: i64,
    },

    /// The caller's organization may not perform this action.
    #[error("client from {msp_id} is not authorized to {action}")]
    Unauthorized { msp_id: String, action: &'static str },

    /// The world state or another collaborator failed.
    #[error("world state unavailable: {0}")]
    StoreUnavailable(String),

    /// A stored value is not in the expected encoding.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A key derived from caller input is not representable.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A balance, allowance or supply computation left the `i64` range.
    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),

    /// Another transaction changed state this one read. Resubmit.
    #[error("transaction conflict on key {key:?}")]
    Conflict { key: String },

    /// The identity collaborator could not resolve the caller.
    #[error("failed to resolve client identity: {0}")]
    Identity(String),

    #[error("the asset {0} already exists")]
    AssetExists(String),

    #[error("the asset {0} does not exist")]
    AssetNotFound(String),

    /// The invocation named a method the contract doesn't have.
    #[error("unknown function: {0}")]
    UnknownFunction(String),
}

impl From<LedgerError> for ContractError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidKey(msg) => ContractError::InvalidKey(msg),
            LedgerError::Conflict { key } => ContractError::Conflict { key },
            LedgerError::Store(err) => ContractError::StoreUnavailable(err.to_string()),
            LedgerError::Serialization(msg) => ContractError::Serialization(msg),
            LedgerError::Identity(msg) => ContractError::Identity(msg),
        }
    }
}

impl From<StoreError> for ContractError {
    fn from(err: StoreError) -> Self {
        LedgerError::from(err).into()
    }
}

impl From<serde_json::Error> for ContractError {
    fn from(err: serde_json::Error) -> Self {
        ContractError::Serialization(err.to_string())
    }
}

/// Convenience alias for contract results.
pub type ContractResult<T> = Result<T, ContractError>;
