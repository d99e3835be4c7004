//! Versioned world state: the public key space plus one key space per
//! private collection.

use std::collections::BTreeMap;
use std::ops::Bound;

use privasset_types::{CollectionName, PrivassetError, Result, constants};
use serde::{Deserialize, Serialize};

/// Version of a key: the block and transaction position that last wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Height {
    pub block_num: u64,
    pub tx_num: u64,
}

impl Height {
    #[must_use]
    pub fn new(block_num: u64, tx_num: u64) -> Self {
        Self { block_num, tx_num }
    }
}

impl std::fmt::Display for Height {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.block_num, self.tx_num)
    }
}

/// A stored value with the height it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Height,
}

/// Lower/upper bounds of a key range, already normalized.
pub(crate) type KeyBounds = (String, Bound<String>);

/// Committed ledger state.
#[derive(Debug, Default, Clone)]
pub struct WorldState {
    public: BTreeMap<String, VersionedValue>,
    private: BTreeMap<CollectionName, BTreeMap<String, VersionedValue>>,
}

impl WorldState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_public(&self, key: &str) -> Option<&VersionedValue> {
        self.public.get(key)
    }

    #[must_use]
    pub fn get_private(&self, collection: &CollectionName, key: &str) -> Option<&VersionedValue> {
        self.private.get(collection).and_then(|c| c.get(key))
    }

    /// Iterate public keys within normalized bounds, ascending.
    pub(crate) fn public_range<'s>(
        &'s self,
        bounds: KeyBounds,
    ) -> impl Iterator<Item = (&'s String, &'s VersionedValue)> + 's {
        let (lower, upper) = bounds;
        let empty = match &upper {
            Bound::Excluded(end) => lower >= *end,
            _ => false,
        };
        let range = if empty {
            None
        } else {
            let upper = match &upper {
                Bound::Excluded(end) => Bound::Excluded(end.as_str()),
                Bound::Included(end) => Bound::Included(end.as_str()),
                Bound::Unbounded => Bound::Unbounded,
            };
            Some(
                self.public
                    .range::<str, _>((Bound::Included(lower.as_str()), upper)),
            )
        };
        range.into_iter().flatten()
    }

    pub(crate) fn put_public(&mut self, key: String, value: Vec<u8>, version: Height) {
        self.public.insert(key, VersionedValue { value, version });
    }

    pub(crate) fn delete_public(&mut self, key: &str) {
        self.public.remove(key);
    }

    pub(crate) fn put_private(
        &mut self,
        collection: &CollectionName,
        key: String,
        value: Vec<u8>,
        version: Height,
    ) {
        self.private
            .entry(collection.clone())
            .or_default()
            .insert(key, VersionedValue { value, version });
    }

    pub(crate) fn delete_private(&mut self, collection: &CollectionName, key: &str) {
        if let Some(c) = self.private.get_mut(collection) {
            c.remove(key);
        }
    }
}

/// Normalize a simple-key range `[start, end)`.
///
/// An empty `start` begins after the composite-key namespace; an empty `end`
/// is unbounded. Neither bound may itself be a composite key.
pub(crate) fn simple_key_bounds(start: &str, end: &str) -> Result<KeyBounds> {
    for key in [start, end] {
        if key.starts_with(constants::COMPOSITE_KEY_NAMESPACE) {
            return Err(PrivassetError::invalid_input(format!(
                "range bound {key:?} falls in the composite key namespace"
            )));
        }
    }
    let lower = if start.is_empty() {
        // First code point after the composite namespace.
        "\u{1}".to_string()
    } else {
        start.to_string()
    };
    let upper = if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end.to_string())
    };
    Ok((lower, upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(keys: &[&str]) -> WorldState {
        let mut ws = WorldState::new();
        for (i, k) in keys.iter().enumerate() {
            ws.put_public((*k).to_string(), vec![1], Height::new(1, i as u64));
        }
        ws
    }

    fn keys(ws: &WorldState, start: &str, end: &str) -> Vec<String> {
        let bounds = simple_key_bounds(start, end).unwrap();
        ws.public_range(bounds).map(|(k, _)| k.clone()).collect()
    }

    #[test]
    fn range_is_half_open_and_sorted() {
        let ws = state_with(&["asset3", "asset1", "asset2", "asset4"]);
        assert_eq!(keys(&ws, "asset1", "asset3"), vec!["asset1", "asset2"]);
    }

    #[test]
    fn empty_bounds_cover_all_simple_keys() {
        let ws = state_with(&["b", "a", "\u{0}transferAgreement\u{0}a\u{0}"]);
        assert_eq!(keys(&ws, "", ""), vec!["a", "b"]);
    }

    #[test]
    fn inverted_range_is_empty_not_panic() {
        let ws = state_with(&["a", "b", "c"]);
        assert!(keys(&ws, "c", "a").is_empty());
        assert!(keys(&ws, "b", "b").is_empty());
    }

    #[test]
    fn composite_bounds_rejected() {
        let err = simple_key_bounds("\u{0}x", "").unwrap_err();
        assert!(matches!(err, PrivassetError::InvalidInput { .. }));
    }

    #[test]
    fn private_delete_of_missing_collection_is_noop() {
        let mut ws = WorldState::new();
        ws.delete_private(&CollectionName::new("c"), "k");
        assert!(ws.get_private(&CollectionName::new("c"), "k").is_none());
    }
}
