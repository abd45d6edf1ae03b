//! Argument handling for string-encoded invocations.
//!
//! On the wire a call is a function name plus positional string arguments,
//! e.g. `["TransferFrom", "alice", "bob", "40"]`. Contracts turn those into
//! typed calls with the helpers below.

use crate::error::{ContractError, ContractResult};

/// Destructure `args` into exactly `N` arguments.
pub fn expect_args<'s, const N: usize>(
    function: &str,
    args: &[&'s str],
) -> ContractResult<[&'s str; N]> {
    <[&'s str; N]>::try_from(args).map_err(|_| {
        ContractError::InvalidArgument(format!(
            "{function} expects {N} argument(s), got {}",
            args.len()
        ))
    })
}

/// Parse an integer argument.
pub fn parse_int(name: &str, raw: &str) -> ContractResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        ContractError::InvalidArgument(format!("{name} must be an integer, got {raw:?}"))
    })
}

/// Parse a floating-point argument.
pub fn parse_float(name: &str, raw: &str) -> ContractResult<f32> {
    raw.trim().parse::<f32>().map_err(|_| {
        ContractError::InvalidArgument(format!("{name} must be a number, got {raw:?}"))
    })
}
