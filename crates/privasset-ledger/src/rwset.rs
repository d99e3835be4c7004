//! Read/write sets produced by simulation.
//!
//! Every read records the version seen (or `None` if the key was absent);
//! every write records the new value (or `None` for a delete). All maps are
//! `BTreeMap` so that iteration, hashing and block contents are identical on
//! every peer that simulates the same proposal.

use std::collections::BTreeMap;
use std::ops::Bound;

use privasset_types::CollectionName;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::block::PrivateWriteHash;
use crate::state::{Height, KeyBounds};

/// A range scan performed during simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeQueryInfo {
    /// Inclusive lower bound.
    pub start: String,
    /// Exclusive upper bound; `None` means unbounded.
    pub end: Option<String>,
    /// `(key, version)` pairs in the order they were yielded.
    pub reads: Vec<(String, Height)>,
    /// Whether the iterator ran to completion.
    pub exhausted: bool,
}

impl RangeQueryInfo {
    pub(crate) fn new(bounds: &KeyBounds) -> Self {
        let (start, end) = bounds;
        Self {
            start: start.clone(),
            end: match end {
                Bound::Excluded(e) | Bound::Included(e) => Some(e.clone()),
                Bound::Unbounded => None,
            },
            reads: Vec::new(),
            exhausted: false,
        }
    }

    pub(crate) fn bounds(&self) -> KeyBounds {
        (
            self.start.clone(),
            self.end.clone().map_or(Bound::Unbounded, Bound::Excluded),
        )
    }
}

/// Reads and writes against the public key space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRwSet {
    pub reads: BTreeMap<String, Option<Height>>,
    pub range_queries: Vec<RangeQueryInfo>,
    pub writes: BTreeMap<String, Option<Vec<u8>>>,
}

/// Reads and writes against one private collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRwSet {
    pub reads: BTreeMap<String, Option<Height>>,
    pub writes: BTreeMap<String, Option<Vec<u8>>>,
}

/// Complete read/write set of one simulated transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRwSet {
    pub public: PublicRwSet,
    pub private: BTreeMap<CollectionName, CollectionRwSet>,
}

impl TxRwSet {
    /// No public or private writes.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.public.writes.is_empty() && self.private.values().all(|c| c.writes.is_empty())
    }

    /// Number of staged writes (public + private).
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.public.writes.len() + self.private.values().map(|c| c.writes.len()).sum::<usize>()
    }

    /// Hashes of the private writes, as recorded in the block.
    ///
    /// Only digests leave the executing peers; the values themselves stay in
    /// the collections.
    #[must_use]
    pub fn private_write_hashes(&self) -> Vec<PrivateWriteHash> {
        self.private
            .iter()
            .flat_map(|(collection, set)| {
                set.writes.iter().map(move |(key, value)| PrivateWriteHash {
                    collection: collection.clone(),
                    key_hash: hex::encode(Sha256::digest(key.as_bytes())),
                    value_hash: value
                        .as_ref()
                        .map(|v| hex::encode(Sha256::digest(v))),
                })
            })
            .collect()
    }
}
