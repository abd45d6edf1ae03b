//! # Token Events
//!
//! Payloads of the events the token contract emits. Both are JSON objects
//! with lowercase field names:
//!
//! ```json
//! {"from": "alice", "to": "bob", "value": 40}
//! {"owner": "alice", "spender": "bob", "value": 50}
//! ```
//!
//! Mints and burns are `Transfer` events whose `from` is
//! [`NULL_ACCOUNT`](ledgerline_protocol::config::NULL_ACCOUNT).

use ledgerline_protocol::config::{EVENT_APPROVAL, EVENT_TRANSFER};
use ledgerline_protocol::TxContext;
use serde::{Deserialize, Serialize};

use crate::error::ContractResult;

/// Body of a `Transfer` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: String,
    pub to: String,
    pub value: i64,
}

/// Body of an `Approval` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub owner: String,
    pub spender: String,
    pub value: i64,
}

pub(crate) fn emit_transfer(
    ctx: &mut TxContext<'_>,
    from: &str,
    to: &str,
    value: i64,
) -> ContractResult<()> {
    let payload = serde_json::to_vec(&TransferEvent {
        from: from.to_string(),
        to: to.to_string(),
        value,
    })?;
    ctx.set_event(EVENT_TRANSFER, payload)?;
    Ok(())
}

pub(crate) fn emit_approval(
    ctx: &mut TxContext<'_>,
    owner: &str,
    spender: &str,
    value: i64,
) -> ContractResult<()> {
    let payload = serde_json::to_vec(&ApprovalEvent {
        owner: owner.to_string(),
        spender: spender.to_string(),
        value,
    })?;
    ctx.set_event(EVENT_APPROVAL, payload)?;
    Ok(())
}
