//! # Allowance Store
//!
//! (owner, spender) → allowance, stored under the composite key
//! `NUL "allowance" NUL owner NUL spender NUL`. A missing record is an
//! allowance of zero.

use ledgerline_protocol::config::ALLOWANCE_PREFIX;
use ledgerline_protocol::storage::composite;
use ledgerline_protocol::TxContext;

use super::accounts::validate_account;
use super::amount;
use crate::error::ContractResult;

/// World-state key of the allowance `owner` granted to `spender`.
pub fn allowance_key(owner: &str, spender: &str) -> ContractResult<String> {
    validate_account(owner)?;
    validate_account(spender)?;
    Ok(composite::create_composite_key(
        ALLOWANCE_PREFIX,
        &[owner, spender],
    )?)
}

pub fn allowance(ctx: &mut TxContext<'_>, owner: &str, spender: &str) -> ContractResult<i64> {
    let key = allowance_key(owner, spender)?;
    match ctx.get_state(&key)? {
        Some(raw) => amount::decode(&key, &raw),
        None => Ok(0),
    }
}

pub fn set_allowance(
    ctx: &mut TxContext<'_>,
    owner: &str,
    spender: &str,
    value: i64,
) -> ContractResult<()> {
    let key = allowance_key(owner, spender)?;
    ctx.put_state(&key, amount::encode(value))?;
    Ok(())
}

/// Every `(spender, allowance)` granted by `owner`, ordered by spender.
pub fn allowances_of(ctx: &mut TxContext<'_>, owner: &str) -> ContractResult<Vec<(String, i64)>> {
    validate_account(owner)?;
    let entries = ctx.state_by_partial_composite_key(ALLOWANCE_PREFIX, &[owner])?;

    let mut grants = Vec::new();
    for (key, raw) in entries {
        let (_, attributes) = composite::split_composite_key(&key)?;
        if let [_, spender] = attributes.as_slice() {
            grants.push((spender.clone(), amount::decode(&key, &raw)?));
        }
    }
    Ok(grants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractError;
    use ledgerline_protocol::{MemoryState, RecordingSink, StaticIdentity};

    #[test]
    fn absent_allowance_is_zero() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let identity = StaticIdentity::new("alice", "Org1MSP");
        let mut ctx = TxContext::new(&state, &sink, &identity);

        assert_eq!(allowance(&mut ctx, "alice", "bob").unwrap(), 0);
    }

    #[test]
    fn allowances_are_directional() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let identity = StaticIdentity::new("alice", "Org1MSP");
        let mut ctx = TxContext::new(&state, &sink, &identity);

        set_allowance(&mut ctx, "alice", "bob", 50).unwrap();
        assert_eq!(allowance(&mut ctx, "alice", "bob").unwrap(), 50);
        assert_eq!(allowance(&mut ctx, "bob", "alice").unwrap(), 0);
    }

    #[test]
    fn key_never_collides_with_balance_keys() {
        let key = allowance_key("alice", "bob").unwrap();
        assert!(validate_account(&key).is_err());
        assert_ne!(key, "alice");
    }

    #[test]
    fn separator_in_owner_is_rejected() {
        assert!(matches!(
            allowance_key("ali\u{0}ce", "bob"),
            Err(ContractError::InvalidKey(_))
        ));
    }

    #[test]
    fn allowances_of_lists_only_that_owner() {
        let state = MemoryState::new();
        let sink = RecordingSink::new();
        let identity = StaticIdentity::new("alice", "Org1MSP");
        let mut ctx = TxContext::new(&state, &sink, &identity);

        set_allowance(&mut ctx, "alice", "carol", 5).unwrap();
        set_allowance(&mut ctx, "alice", "bob", 50).unwrap();
        set_allowance(&mut ctx, "alice2", "bob", 7).unwrap();
        set_allowance(&mut ctx, "bob", "alice", 9).unwrap();

        let grants = allowances_of(&mut ctx, "alice").unwrap();
        assert_eq!(
            grants,
            vec![("bob".to_string(), 50), ("carol".to_string(), 5)]
        );
    }
}
