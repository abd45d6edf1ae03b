//! # Ledger Configuration & Constants
//!
//! Every magic string the chaincode writes into world state lives here. If
//! you're hardcoding `"totalSupply"` somewhere else, move it here first.
//!
//! The key names below are part of the persisted layout. Renaming one after
//! a ledger has been populated orphans every record written under the old
//! name, so treat them as frozen.
//!
//! Runtime-tunable behaviour (token name, issuer organizations, and the two
//! policy switches for delegated spends and burns) is carried by
//! [`TokenConfig`], which deserializes from JSON with sensible defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// World-State Layout
// ---------------------------------------------------------------------------

/// Key holding the global token supply as decimal text.
pub const TOTAL_SUPPLY_KEY: &str = "totalSupply";

/// Object type used when deriving allowance composite keys.
pub const ALLOWANCE_PREFIX: &str = "allowance";

/// First character of every composite key. Plain keys never start with it,
/// which keeps composite and simple keyspaces disjoint.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0000}';

/// Largest Unicode scalar value. Appended to a partial composite key to form
/// the exclusive upper bound of a prefix range scan.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

// ---------------------------------------------------------------------------
// Token Defaults
// ---------------------------------------------------------------------------

/// Display name of the token when no configuration overrides it.
pub const DEFAULT_TOKEN_NAME: &str = "MSc Token";

/// Organization (MSP) whose members may mint and burn by default.
pub const DEFAULT_ISSUER_MSP: &str = "Org1MSP";

/// Counterparty recorded on issuance events. Mirrors the Ethereum convention
/// of using the zero address for tokens that come from nowhere.
pub const NULL_ACCOUNT: &str = "0x0";

/// Event name for balance movements (transfers, mints and burns).
pub const EVENT_TRANSFER: &str = "Transfer";

/// Event name for allowance updates.
pub const EVENT_APPROVAL: &str = "Approval";

// ---------------------------------------------------------------------------
// Policy Switches
// ---------------------------------------------------------------------------

/// How `TransferFrom` compares the stored allowance against the requested
/// amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceCheck {
    /// The allowance must be strictly greater than the amount. An allowance
    /// of exactly 50 therefore permits spends of at most 49. This is the
    /// behaviour deployed ledgers were written against, so it stays the
    /// default.
    #[default]
    ExceedsAmount,
    /// The allowance must be at least the amount (standard ERC-20).
    CoversAmount,
}

impl AllowanceCheck {
    /// Returns `true` when `allowance` is enough to spend `amount`.
    pub fn permits(self, allowance: i64, amount: i64) -> bool {
        match self {
            AllowanceCheck::ExceedsAmount => allowance > amount,
            AllowanceCheck::CoversAmount => allowance >= amount,
        }
    }
}

/// Whether `Burn` verifies the caller can cover the burned amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnCheck {
    /// Reject burns larger than the caller's balance.
    #[default]
    RequireFunds,
    /// Debit unconditionally. Balances may go negative. Only useful for
    /// replaying ledgers produced by chaincode that never had the guard.
    Unchecked,
}

// ---------------------------------------------------------------------------
// TokenConfig
// ---------------------------------------------------------------------------

/// Errors raised while loading a [`TokenConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime configuration of the token contract.
///
/// Every field has a default, so `{}` is a valid configuration document:
///
/// ```json
/// {
///   "name": "MSc Token",
///   "issuers": ["Org1MSP"],
///   "allowance_check": "exceeds_amount",
///   "burn_check": "require_funds"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Human-readable token name returned by `Name`.
    pub name: String,
    /// MSP identifiers allowed to mint and burn.
    pub issuers: Vec<String>,
    /// Comparison used by `TransferFrom`.
    pub allowance_check: AllowanceCheck,
    /// Guard applied by `Burn`.
    pub burn_check: BurnCheck,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOKEN_NAME.to_string(),
            issuers: vec![DEFAULT_ISSUER_MSP.to_string()],
            allowance_check: AllowanceCheck::default(),
            burn_check: BurnCheck::default(),
        }
    }
}

impl TokenConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Builder-style override of the allowance comparison.
    pub fn with_allowance_check(mut self, check: AllowanceCheck) -> Self {
        self.allowance_check = check;
        self
    }

    /// Builder-style override of the burn guard.
    pub fn with_burn_check(mut self, check: BurnCheck) -> Self {
        self.burn_check = check;
        self
    }

    /// Builder-style replacement of the issuer list.
    pub fn with_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issuers = issuers.into_iter().map(Into::into).collect();
        self
    }
}
