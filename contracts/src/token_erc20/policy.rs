//! # Issuer Policy
//!
//! Decides which organizations may mint and burn. The contract asks one
//! question, "is this MSP an issuer?", so the policy is a single-method
//! trait. Closures work too:
//!
//! ```
//! use ledgerline_contracts::token_erc20::{IssuerPolicy, TokenContract};
//! use ledgerline_protocol::config::TokenConfig;
//!
//! let central_banks = |msp: &str| msp.ends_with("CentralBankMSP");
//! assert!(central_banks.is_issuer("EuroCentralBankMSP"));
//! let _contract = TokenContract::with_issuer_policy(TokenConfig::default(), central_banks);
//! ```

use std::collections::BTreeSet;

use ledgerline_protocol::config::TokenConfig;

/// Authorization rule for supply-changing operations.
pub trait IssuerPolicy: Send + Sync {
    fn is_issuer(&self, msp_id: &str) -> bool;
}

impl<F> IssuerPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_issuer(&self, msp_id: &str) -> bool {
        self(msp_id)
    }
}

/// Exact-match allow-list of issuer MSP ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MspAllowList {
    msps: BTreeSet<String>,
}

impl MspAllowList {
    pub fn new<I, S>(msps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            msps: msps.into_iter().map(Into::into).collect(),
        }
    }

    /// The issuers listed in a token configuration.
    pub fn from_config(config: &TokenConfig) -> Self {
        Self::new(config.issuers.iter().cloned())
    }

    pub fn contains(&self, msp_id: &str) -> bool {
        self.msps.contains(msp_id)
    }
}

impl IssuerPolicy for MspAllowList {
    fn is_issuer(&self, msp_id: &str) -> bool {
        self.contains(msp_id)
    }
}
