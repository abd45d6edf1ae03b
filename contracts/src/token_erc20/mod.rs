//! # ERC-20 Token Contract
//!
//! A fungible token kept in a chaincode namespace's world state. Balances
//! live under the raw account id, allowances under composite keys, and the
//! issued total under `totalSupply`.
//!
//! ## Operations
//!
//! | Wire name         | Method                               | Writes |
//! |-------------------|--------------------------------------|--------|
//! | `BalanceOf`       | [`TokenContract::balance_of`]        | no     |
//! | `Transfer`        | [`TokenContract::transfer`]          | yes    |
//! | `TransferFrom`    | [`TokenContract::transfer_from`]     | yes    |
//! | `Approve`         | [`TokenContract::approve`]           | yes    |
//! | `Allowance`       | [`TokenContract::allowance`]         | no     |
//! | `Mint`            | [`TokenContract::mint`]              | yes    |
//! | `Burn`            | [`TokenContract::burn`]              | yes    |
//! | `ClientAccountID` | [`TokenContract::client_account_id`] | no     |
//! | `TotalSupply`     | [`TokenContract::total_supply`]      | no     |
//! | `Name`            | [`TokenContract::name`]              | no     |
//!
//! Every write operation emits exactly one event on success and nothing on
//! failure.

mod accounts;
mod allowances;
mod amount;
mod delegation;
pub mod events;
mod issuance;
pub mod policy;
mod supply;
mod transfer;

use std::fmt;
use std::str::FromStr;

use ledgerline_protocol::config::TokenConfig;
use ledgerline_protocol::TxContext;
use tracing::debug;

use crate::error::{ContractError, ContractResult};
use crate::router::{expect_args, parse_int};

pub use events::{ApprovalEvent, TransferEvent};
pub use policy::{IssuerPolicy, MspAllowList};

/// The token contract. Holds configuration only; all state is in the
/// transaction context passed to each call.
pub struct TokenContract {
    config: TokenConfig,
    issuers: Box<dyn IssuerPolicy>,
}

impl TokenContract {
    /// A contract whose issuers are the MSPs listed in `config`.
    pub fn new(config: TokenConfig) -> Self {
        let issuers = MspAllowList::from_config(&config);
        Self::with_issuer_policy(config, issuers)
    }

    /// A contract with a custom issuer rule. `config.issuers` is ignored.
    pub fn with_issuer_policy(config: TokenConfig, issuers: impl IssuerPolicy + 'static) -> Self {
        Self {
            config,
            issuers: Box::new(issuers),
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Balance of `account`.
    ///
    /// # Errors
    ///
    /// [`ContractError::AccountNotFound`] if the account was never credited.
    pub fn balance_of(&self, ctx: &mut TxContext<'_>, account: &str) -> ContractResult<i64> {
        let balance = accounts::balance(ctx, account)?;
        debug!(account, balance, "balance queried");
        Ok(balance)
    }

    /// Total tokens issued, zero before the first mint.
    pub fn total_supply(&self, ctx: &mut TxContext<'_>) -> ContractResult<i64> {
        supply::total_supply(ctx)
    }

    /// The caller's account id as reported by the identity provider.
    pub fn client_account_id(&self, ctx: &TxContext<'_>) -> ContractResult<String> {
        Ok(ctx.client_identity().id()?)
    }

    /// Dispatch a string-encoded invocation. Results are returned as UTF-8
    /// text: decimal integers for amounts, the raw id for
    /// `ClientAccountID`, and empty for operations without output.
    pub fn invoke(
        &self,
        ctx: &mut TxContext<'_>,
        function: &str,
        args: &[&str],
    ) -> ContractResult<Vec<u8>> {
        let method: TokenMethod = function.parse()?;
        debug!(tx_id = %ctx.tx_id(), method = %method, "invoking token contract");

        let output = match method {
            TokenMethod::BalanceOf => {
                let [account] = expect_args::<1>(function, args)?;
                self.balance_of(ctx, account)?.to_string()
            }
            TokenMethod::Transfer => {
                let [to, amount] = expect_args::<2>(function, args)?;
                self.transfer(ctx, to, parse_int("amount", amount)?)?;
                String::new()
            }
            TokenMethod::TransferFrom => {
                let [from, to, amount] = expect_args::<3>(function, args)?;
                self.transfer_from(ctx, from, to, parse_int("amount", amount)?)?;
                String::new()
            }
            TokenMethod::Approve => {
                let [spender, amount] = expect_args::<2>(function, args)?;
                self.approve(ctx, spender, parse_int("amount", amount)?)?;
                String::new()
            }
            TokenMethod::Allowance => {
                let [owner, spender] = expect_args::<2>(function, args)?;
                self.allowance(ctx, owner, spender)?.to_string()
            }
            TokenMethod::Mint => {
                let [amount] = expect_args::<1>(function, args)?;
                self.mint(ctx, parse_int("amount", amount)?)?;
                String::new()
            }
            TokenMethod::Burn => {
                let [amount] = expect_args::<1>(function, args)?;
                self.burn(ctx, parse_int("amount", amount)?)?;
                String::new()
            }
            TokenMethod::ClientAccountId => {
                expect_args::<0>(function, args)?;
                self.client_account_id(ctx)?
            }
            TokenMethod::TotalSupply => {
                expect_args::<0>(function, args)?;
                self.total_supply(ctx)?.to_string()
            }
            TokenMethod::Name => {
                expect_args::<0>(function, args)?;
                self.name().to_string()
            }
        };
        Ok(output.into_bytes())
    }
}

impl Default for TokenContract {
    fn default() -> Self {
        Self::new(TokenConfig::default())
    }
}

impl fmt::Debug for TokenContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenContract")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Methods reachable through [`TokenContract::invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenMethod {
    BalanceOf,
    Transfer,
    TransferFrom,
    Approve,
    Allowance,
    Mint,
    Burn,
    ClientAccountId,
    TotalSupply,
    Name,
}

impl TokenMethod {
    pub const ALL: [TokenMethod; 10] = [
        TokenMethod::BalanceOf,
        TokenMethod::Transfer,
        TokenMethod::TransferFrom,
        TokenMethod::Approve,
        TokenMethod::Allowance,
        TokenMethod::Mint,
        TokenMethod::Burn,
        TokenMethod::ClientAccountId,
        TokenMethod::TotalSupply,
        TokenMethod::Name,
    ];

    /// Name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenMethod::BalanceOf => "BalanceOf",
            TokenMethod::Transfer => "Transfer",
            TokenMethod::TransferFrom => "TransferFrom",
            TokenMethod::Approve => "Approve",
            TokenMethod::Allowance => "Allowance",
            TokenMethod::Mint => "Mint",
            TokenMethod::Burn => "Burn",
            TokenMethod::ClientAccountId => "ClientAccountID",
            TokenMethod::TotalSupply => "TotalSupply",
            TokenMethod::Name => "Name",
        }
    }

    /// Queries may be evaluated without ordering or committing.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            TokenMethod::BalanceOf
                | TokenMethod::Allowance
                | TokenMethod::ClientAccountId
                | TokenMethod::TotalSupply
                | TokenMethod::Name
        )
    }
}

impl fmt::Display for TokenMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenMethod {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| ContractError::UnknownFunction(s.to_string()))
    }
}
