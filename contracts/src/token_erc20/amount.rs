//! Decimal-text encoding of stored integers.
//!
//! Balances, allowances and the supply are all stored as their base-10
//! representation (`"100"`, `"-3"`), which keeps the world state readable by
//! any tooling that can dump keys.

use crate::error::{ContractError, ContractResult};

pub(crate) fn encode(value: i64) -> Vec<u8> {
    value.to_string().into_bytes()
}

pub(crate) fn decode(key: &str, raw: &[u8]) -> ContractResult<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .ok_or_else(|| {
            ContractError::Serialization(format!(
                "value stored under {key:?} is not a decimal integer: {:?}",
                String::from_utf8_lossy(raw)
            ))
        })
}
