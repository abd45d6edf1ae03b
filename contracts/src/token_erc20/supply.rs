//! # Supply Counter
//!
//! Total issued tokens under [`TOTAL_SUPPLY_KEY`]. Absent until the first
//! mint, and absent reads as zero. Only issuance touches it.

use ledgerline_protocol::config::TOTAL_SUPPLY_KEY;
use ledgerline_protocol::TxContext;

use super::amount;
use crate::error::ContractResult;

pub fn total_supply(ctx: &mut TxContext<'_>) -> ContractResult<i64> {
    match ctx.get_state(TOTAL_SUPPLY_KEY)? {
        Some(raw) => amount::decode(TOTAL_SUPPLY_KEY, &raw),
        None => Ok(0),
    }
}

pub fn set_total_supply(ctx: &mut TxContext<'_>, value: i64) -> ContractResult<()> {
    ctx.put_state(TOTAL_SUPPLY_KEY, amount::encode(value))?;
    Ok(())
}
