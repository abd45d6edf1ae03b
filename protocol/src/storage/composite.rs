//! # Composite Keys
//!
//! Several logical fields folded into one world-state key:
//!
//! ```text
//! NUL objectType NUL attr1 NUL attr2 NUL ... attrN NUL
//! ```
//!
//! Every component is *terminated* (not merely separated) by `U+0000`, and
//! no component may contain `U+0000`. That makes the encoding injective:
//! `("ab", "c")` and `("a", "bc")` produce different keys, and any key can
//! be split back into exactly the components that built it.
//!
//! Components also may not contain `U+10FFFF`. It is the exclusive upper
//! bound of every prefix scan (see [`partial_key_range`]), so a component
//! holding it could escape the scan window.
//!
//! The leading `U+0000` keeps composite keys in their own corner of the
//! keyspace. Simple keys (account ids, asset ids) must not start with it.

use crate::config::{COMPOSITE_KEY_NAMESPACE, MAX_UNICODE_RUNE};
use crate::error::{LedgerError, LedgerResult};

fn validate_component(component: &str) -> LedgerResult<()> {
    if component.contains(COMPOSITE_KEY_NAMESPACE) || component.contains(MAX_UNICODE_RUNE) {
        return Err(LedgerError::InvalidKey(format!(
            "composite key component {component:?} contains a reserved character (U+0000 or U+10FFFF)"
        )));
    }
    Ok(())
}

/// Build a composite key from an object type and its attributes.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidKey`] if `object_type` is empty or any
/// component contains a reserved character.
pub fn create_composite_key(object_type: &str, attributes: &[&str]) -> LedgerResult<String> {
    if object_type.is_empty() {
        return Err(LedgerError::InvalidKey(
            "composite key object type cannot be empty".to_string(),
        ));
    }
    validate_component(object_type)?;

    let capacity = 2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_NAMESPACE);
    for attribute in attributes {
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }
    Ok(key)
}

/// Split a composite key back into its object type and attributes.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidKey`] if `key` is not a composite key.
pub fn split_composite_key(key: &str) -> LedgerResult<(String, Vec<String>)> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_KEY_NAMESPACE))
        .ok_or_else(|| LedgerError::InvalidKey(format!("{key:?} is not a composite key")))?;

    let mut components = body.split(COMPOSITE_KEY_NAMESPACE).map(str::to_string);
    let object_type = components
        .next()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| LedgerError::InvalidKey(format!("{key:?} has no object type")))?;
    Ok((object_type, components.collect()))
}

/// `[start, end)` bounds covering every composite key that begins with
/// `object_type` followed by the given leading attributes.
pub fn partial_key_range(object_type: &str, attributes: &[&str]) -> LedgerResult<(String, String)> {
    let start = create_composite_key(object_type, attributes)?;
    let mut end = start.clone();
    end.push(MAX_UNICODE_RUNE);
    Ok((start, end))
}

/// Returns `true` if `key` lives in the composite keyspace.
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}
