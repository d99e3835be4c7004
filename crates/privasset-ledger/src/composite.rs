//! Composite keys.
//!
//! A composite key is `U+0000 objectType U+0000 attr1 U+0000 attr2 U+0000 …`.
//! The leading delimiter puts every composite key below any simple key, so
//! simple-key range scans never see them, and a partial key (a prefix of
//! attributes) selects every record sharing that prefix.

use std::ops::Bound;

use privasset_types::{PrivassetError, Result, constants};

use crate::state::KeyBounds;

fn validate_component(component: &str) -> Result<()> {
    if component.contains(constants::MIN_UNICODE_RUNE)
        || component.contains(constants::MAX_UNICODE_RUNE)
    {
        return Err(PrivassetError::invalid_input(format!(
            "composite key component {component:?} contains a reserved code point"
        )));
    }
    Ok(())
}

/// Build a composite key from an object type and its attributes.
pub fn create_composite_key(object_type: &str, attributes: &[&str]) -> Result<String> {
    validate_component(object_type)?;
    if object_type.is_empty() {
        return Err(PrivassetError::invalid_input(
            "composite key object type must be non-empty",
        ));
    }
    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(constants::COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(constants::MIN_UNICODE_RUNE);
    for attr in attributes {
        validate_component(attr)?;
        key.push_str(attr);
        key.push(constants::MIN_UNICODE_RUNE);
    }
    Ok(key)
}

/// Split a composite key back into `(object_type, attributes)`.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>)> {
    let body = key
        .strip_prefix(constants::COMPOSITE_KEY_NAMESPACE)
        .ok_or_else(|| PrivassetError::invalid_input(format!("{key:?} is not a composite key")))?;
    let mut parts: Vec<String> = body
        .split(constants::MIN_UNICODE_RUNE)
        .map(str::to_string)
        .collect();
    // Trailing delimiter leaves one empty tail component.
    if parts.last().is_some_and(String::is_empty) {
        parts.pop();
    }
    if parts.is_empty() {
        return Err(PrivassetError::invalid_input(format!(
            "{key:?} has no object type"
        )));
    }
    let object_type = parts.remove(0);
    Ok((object_type, parts))
}

/// Range selecting every key that extends the given partial composite key.
pub(crate) fn partial_key_bounds(object_type: &str, attributes: &[&str]) -> Result<KeyBounds> {
    let prefix = create_composite_key(object_type, attributes)?;
    let mut end = prefix.clone();
    end.push(constants::MAX_UNICODE_RUNE);
    Ok((prefix, Bound::Excluded(end)))
}
