//! Error types shared by the execution substrate.

use crate::storage::StoreError;

/// Errors surfaced by the transaction context and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A key or composite-key component is malformed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A key read by this transaction was changed by another commit.
    #[error("read conflict on key {key:?}: state changed since it was read")]
    Conflict {
        /// The first key whose version no longer matches.
        key: String,
    },

    /// The world state could not be read or written.
    #[error("world state unavailable: {0}")]
    Store(StoreError),

    /// A stored or staged value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The identity collaborator could not resolve the caller.
    #[error("failed to resolve client identity: {0}")]
    Identity(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { key } => LedgerError::Conflict { key },
            other => LedgerError::Store(other),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

/// Convenience alias for results carrying a [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;
