//! # Account Store
//!
//! Account id → balance, stored under the raw account id.
//!
//! Whether a missing record is an error depends on the direction of the
//! movement:
//!
//! | Operation                        | Missing record means |
//! |----------------------------------|----------------------|
//! | `BalanceOf`, debit side of `Transfer`/`TransferFrom` | `AccountNotFound` |
//! | credit side of a transfer, `Mint`, `Burn`            | balance 0         |
//!
//! An account therefore comes into existence the first time it is credited
//! and is never removed.

use ledgerline_protocol::config::TOTAL_SUPPLY_KEY;
use ledgerline_protocol::storage::composite::is_composite_key;
use ledgerline_protocol::TxContext;

use super::amount;
use crate::error::{ContractError, ContractResult};

/// Reject ids that would collide with other records in the namespace.
pub fn validate_account(account: &str) -> ContractResult<()> {
    if account.is_empty() {
        return Err(ContractError::InvalidKey(
            "account id cannot be empty".to_string(),
        ));
    }
    if is_composite_key(account) {
        return Err(ContractError::InvalidKey(format!(
            "account id {account:?} starts with the composite-key namespace"
        )));
    }
    if account == TOTAL_SUPPLY_KEY {
        return Err(ContractError::InvalidKey(format!(
            "account id {account:?} is reserved"
        )));
    }
    Ok(())
}

/// Balance of an existing account.
///
/// # Errors
///
/// [`ContractError::AccountNotFound`] if the account was never credited.
pub fn balance(ctx: &mut TxContext<'_>, account: &str) -> ContractResult<i64> {
    validate_account(account)?;
    match ctx.get_state(account)? {
        Some(raw) => amount::decode(account, &raw),
        None => Err(ContractError::AccountNotFound(account.to_string())),
    }
}

/// Balance of an account, treating a missing record as zero.
pub fn balance_or_zero(ctx: &mut TxContext<'_>, account: &str) -> ContractResult<i64> {
    validate_account(account)?;
    match ctx.get_state(account)? {
        Some(raw) => amount::decode(account, &raw),
        None => Ok(0),
    }
}

/// Overwrite an account's balance.
pub fn set_balance(ctx: &mut TxContext<'_>, account: &str, value: i64) -> ContractResult<()> {
    validate_account(account)?;
    ctx.put_state(account, amount::encode(value))?;
    Ok(())
}
