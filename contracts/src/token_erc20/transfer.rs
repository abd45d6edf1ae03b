//! # Transfer Engine
//!
//! Moves tokens between two accounts. The validate-and-apply routine
//! ([`move_balance`]) is shared by `Transfer` and `TransferFrom`; each public
//! entry point emits its own `Transfer` event afterwards, so one call
//! publishes exactly one event.
//!
//! ## Rules
//!
//! 1. `from != to`, `amount >= 0`.
//! 2. `from` must already hold a balance record.
//! 3. `balance(from) >= amount`.
//! 4. `from -= amount`, `to += amount` (missing `to` starts at zero).

use ledgerline_protocol::TxContext;
use tracing::debug;

use super::accounts;
use super::events::emit_transfer;
use super::TokenContract;
use crate::error::{ContractError, ContractResult};

/// Validate and apply a balance movement. Emits nothing.
pub(crate) fn move_balance(
    ctx: &mut TxContext<'_>,
    from: &str,
    to: &str,
    amount: i64,
) -> ContractResult<()> {
    if from == to {
        return Err(ContractError::InvalidArgument(
            "cannot transfer to and from the same account".to_string(),
        ));
    }
    if amount < 0 {
        return Err(ContractError::InvalidArgument(
            "transfer amount cannot be negative".to_string(),
        ));
    }
    accounts::validate_account(to)?;

    let from_balance = accounts::balance(ctx, from)?;
    if from_balance < amount {
        return Err(ContractError::InsufficientFunds {
            account: from.to_string(),
            balance: from_balance,
            amount,
        });
    }
    let to_balance = accounts::balance_or_zero(ctx, to)?;

    let from_updated = from_balance
        .checked_sub(amount)
        .ok_or(ContractError::Overflow("debiting sender"))?;
    let to_updated = to_balance
        .checked_add(amount)
        .ok_or(ContractError::Overflow("crediting recipient"))?;

    accounts::set_balance(ctx, from, from_updated)?;
    accounts::set_balance(ctx, to, to_updated)?;

    debug!(
        account = from,
        from = from_balance,
        to = from_updated,
        "sender balance updated"
    );
    debug!(
        account = to,
        from = to_balance,
        to = to_updated,
        "recipient balance updated"
    );
    Ok(())
}

impl TokenContract {
    /// Transfer `amount` from the caller's account to `to`.
    ///
    /// # Errors
    ///
    /// - [`ContractError::InvalidArgument`] if `to` is the caller or the
    ///   amount is negative.
    /// - [`ContractError::AccountNotFound`] if the caller holds no balance.
    /// - [`ContractError::InsufficientFunds`] if the caller's balance is
    ///   smaller than `amount`.
    pub fn transfer(&self, ctx: &mut TxContext<'_>, to: &str, amount: i64) -> ContractResult<()> {
        let from = ctx.client_identity().id()?;
        move_balance(ctx, &from, to, amount)?;
        emit_transfer(ctx, &from, to, amount)
    }
}
