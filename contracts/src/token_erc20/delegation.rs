//! # Allowance Engine
//!
//! ERC-20 delegated spending. An owner approves a spender for some amount;
//! the spender may then move up to that much out of the owner's account
//! with `TransferFrom`.
//!
//! ## The boundary
//!
//! How much of the allowance a spender may use depends on
//! [`AllowanceCheck`](ledgerline_protocol::config::AllowanceCheck). Under
//! the default `ExceedsAmount` the allowance must be *strictly greater* than
//! the amount, so approving 50 lets the spender move at most 49 in one call.
//! Ledgers deployed with that rule depend on it; switch to `CoversAmount`
//! for standard ERC-20 semantics.

use ledgerline_protocol::TxContext;
use tracing::info;

use super::allowances;
use super::events::{emit_approval, emit_transfer};
use super::transfer::move_balance;
use super::TokenContract;
use crate::error::{ContractError, ContractResult};

impl TokenContract {
    /// Set the allowance the caller grants to `spender`, replacing any
    /// previous value. The amount is stored as given.
    pub fn approve(
        &self,
        ctx: &mut TxContext<'_>,
        spender: &str,
        amount: i64,
    ) -> ContractResult<()> {
        let owner = ctx.client_identity().id()?;
        allowances::set_allowance(ctx, &owner, spender, amount)?;
        emit_approval(ctx, &owner, spender, amount)?;

        info!(
            owner = %owner,
            spender,
            amount,
            "approved withdrawal allowance"
        );
        Ok(())
    }

    /// Remaining allowance `owner` has granted to `spender` (zero if none).
    pub fn allowance(
        &self,
        ctx: &mut TxContext<'_>,
        owner: &str,
        spender: &str,
    ) -> ContractResult<i64> {
        let remaining = allowances::allowance(ctx, owner, spender)?;
        info!(owner, spender, remaining, "allowance queried");
        Ok(remaining)
    }

    /// Every `(spender, allowance)` pair granted by `owner`.
    pub fn allowances_of(
        &self,
        ctx: &mut TxContext<'_>,
        owner: &str,
    ) -> ContractResult<Vec<(String, i64)>> {
        allowances::allowances_of(ctx, owner)
    }

    /// Move `amount` from `from` to `to` on behalf of `from`, spending the
    /// caller's allowance.
    ///
    /// # Errors
    ///
    /// - [`ContractError::InvalidArgument`] if `amount <= 0` (or the
    ///   transfer rules reject the pair).
    /// - [`ContractError::InsufficientAllowance`] if the allowance check
    ///   fails.
    /// - Anything [`transfer`](Self::transfer) can fail with, for `from`.
    pub fn transfer_from(
        &self,
        ctx: &mut TxContext<'_>,
        from: &str,
        to: &str,
        amount: i64,
    ) -> ContractResult<()> {
        if amount <= 0 {
            return Err(ContractError::InvalidArgument(
                "transfer amount must be a positive integer".to_string(),
            ));
        }
        let spender = ctx.client_identity().id()?;

        let current = allowances::allowance(ctx, from, &spender)?;
        if !self.config().allowance_check.permits(current, amount) {
            return Err(ContractError::InsufficientAllowance {
                owner: from.to_string(),
                spender,
                allowance: current,
                amount,
            });
        }

        move_balance(ctx, from, to, amount)?;

        let updated = current
            .checked_sub(amount)
            .ok_or(ContractError::Overflow("decreasing allowance"))?;
        allowances::set_allowance(ctx, from, &spender, updated)?;
        emit_transfer(ctx, from, to, amount)?;

        info!(
            spender = %spender,
            owner = from,
            from = current,
            to = updated,
            "spender allowance updated"
        );
        Ok(())
    }
}
