//! # Client Identity
//!
//! Chaincode never authenticates anyone itself. By the time an invocation
//! reaches a contract, the submitting client has already been resolved to
//! two strings:
//!
//! - an **account id**, stable per client, used as the ledger address;
//! - an **MSP id**, the organization that issued the client's credential,
//!   used for coarse-grained authorization (who may mint, for example).
//!
//! [`ClientIdentity`] is that boundary. [`StaticIdentity`] is the trivial
//! implementation used by tests and by embedders that resolve identities
//! upstream.

use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;

/// The resolved identity of the client submitting a transaction.
pub trait ClientIdentity: Send + Sync {
    /// Stable account identifier of the caller.
    fn id(&self) -> LedgerResult<String>;

    /// Membership service provider (organization) of the caller.
    fn msp_id(&self) -> LedgerResult<String>;
}

/// An identity known up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaticIdentity {
    id: String,
    msp_id: String,
}

impl StaticIdentity {
    pub fn new(id: impl Into<String>, msp_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            msp_id: msp_id.into(),
        }
    }

    /// Build the account id an X.509 client certificate resolves to:
    /// `x509::<subject DN>::<issuer DN>`.
    pub fn x509(subject: &str, issuer: &str, msp_id: impl Into<String>) -> Self {
        Self::new(format!("x509::{subject}::{issuer}"), msp_id)
    }

    pub fn account_id(&self) -> &str {
        &self.id
    }

    pub fn organization(&self) -> &str {
        &self.msp_id
    }
}

impl ClientIdentity for StaticIdentity {
    fn id(&self) -> LedgerResult<String> {
        Ok(self.id.clone())
    }

    fn msp_id(&self) -> LedgerResult<String> {
        Ok(self.msp_id.clone())
    }
}
