//! Transaction context: the chaincode's only window onto the ledger.
//!
//! Reads come from the committed snapshot the simulation started from, never
//! from the transaction's own pending writes. Every read and write is
//! recorded in the [`TxRwSet`] that commit later validates and applies.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use privasset_types::{CollectionName, OrgId, PrivassetError, Result, TxId, constants};

use crate::collection::CollectionRegistry;
use crate::composite::partial_key_bounds;
use crate::proposal::Proposal;
use crate::rwset::{RangeQueryInfo, TxRwSet};
use crate::state::{KeyBounds, VersionedValue, WorldState, simple_key_bounds};

/// Transient data: confidential inputs keyed by name.
pub type TransientMap = BTreeMap<String, Vec<u8>>;

/// Per-transaction view of the ledger handed to chaincode.
pub struct TxContext<'s> {
    proposal: &'s Proposal,
    peer_org: OrgId,
    transient: TransientMap,
    snapshot: &'s WorldState,
    collections: &'s CollectionRegistry,
    rwset: TxRwSet,
}

impl<'s> TxContext<'s> {
    pub(crate) fn new(
        proposal: &'s Proposal,
        peer_org: OrgId,
        transient: TransientMap,
        snapshot: &'s WorldState,
        collections: &'s CollectionRegistry,
    ) -> Self {
        Self {
            proposal,
            peer_org,
            transient,
            snapshot,
            collections,
            rwset: TxRwSet::default(),
        }
    }

    // -----------------------------------------------------------------
    // Invocation metadata
    // -----------------------------------------------------------------

    #[must_use]
    pub fn tx_id(&self) -> TxId {
        self.proposal.tx_id
    }

    /// Organization of the client that signed the proposal.
    #[must_use]
    pub fn client_org(&self) -> &OrgId {
        &self.proposal.creator
    }

    /// Organization of the peer executing this simulation.
    #[must_use]
    pub fn peer_org(&self) -> &OrgId {
        &self.peer_org
    }

    /// Proposal timestamp. Identical on every executing peer.
    #[must_use]
    pub fn tx_timestamp(&self) -> DateTime<Utc> {
        self.proposal.timestamp
    }

    /// A confidential input supplied with this transaction.
    #[must_use]
    pub fn transient(&self, key: &str) -> Option<&[u8]> {
        self.transient.get(key).map(Vec::as_slice)
    }

    // -----------------------------------------------------------------
    // Public state
    // -----------------------------------------------------------------

    /// Read a public key, recording the version seen.
    pub fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let found = self.snapshot.get_public(key);
        self.rwset
            .public
            .reads
            .insert(key.to_string(), found.map(|v| v.version));
        Ok(found.map(|v| v.value.clone()))
    }

    /// Stage a public write.
    pub fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        validate_key(key)?;
        if value.is_empty() {
            return Err(PrivassetError::invalid_input(format!(
                "value for key {key:?} must be non-empty; use del_state to delete"
            )));
        }
        self.rwset.public.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    /// Stage a public delete.
    pub fn del_state(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.rwset.public.writes.insert(key.to_string(), None);
        Ok(())
    }

    /// Simple keys in `[start, end)`, ascending. Empty `end` is unbounded.
    ///
    /// The returned iterator is lazy; keys are recorded for phantom
    /// detection as they are yielded. Calling again restarts the scan.
    pub fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<StateRange<'_>> {
        let bounds = simple_key_bounds(start, end)?;
        Ok(self.open_range(bounds))
    }

    /// Every composite key extending `(object_type, attributes…)`.
    pub fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<StateRange<'_>> {
        let bounds = partial_key_bounds(object_type, attributes)?;
        Ok(self.open_range(bounds))
    }

    fn open_range<'c>(&'c mut self, bounds: KeyBounds) -> StateRange<'c> {
        let snapshot: &'c WorldState = self.snapshot;
        let queries = &mut self.rwset.public.range_queries;
        queries.push(RangeQueryInfo::new(&bounds));
        let index = queries.len() - 1;
        StateRange {
            inner: Box::new(snapshot.public_range(bounds)),
            info: &mut queries[index],
        }
    }

    // -----------------------------------------------------------------
    // Private collections
    // -----------------------------------------------------------------

    /// Read from a private collection.
    ///
    /// A peer whose organization is not a member of the collection does not
    /// hold its data, so the read comes back `None` rather than failing.
    pub fn get_private_data(
        &mut self,
        collection: &CollectionName,
        key: &str,
    ) -> Result<Option<Vec<u8>>> {
        self.collections.ensure_defined(collection)?;
        validate_key(key)?;
        if !self.collections.is_member(collection, &self.peer_org) {
            tracing::debug!(
                collection = %collection,
                peer_org = %self.peer_org,
                "Private read on non-member peer returns empty"
            );
            return Ok(None);
        }
        let found = self.snapshot.get_private(collection, key);
        self.rwset
            .private
            .entry(collection.clone())
            .or_default()
            .reads
            .insert(key.to_string(), found.map(|v| v.version));
        Ok(found.map(|v| v.value.clone()))
    }

    /// Stage a private write. Allowed on any defined collection.
    pub fn put_private_data(
        &mut self,
        collection: &CollectionName,
        key: &str,
        value: Vec<u8>,
    ) -> Result<()> {
        self.collections.ensure_defined(collection)?;
        validate_key(key)?;
        if value.is_empty() {
            return Err(PrivassetError::invalid_input(format!(
                "private value for key {key:?} must be non-empty"
            )));
        }
        self.rwset
            .private
            .entry(collection.clone())
            .or_default()
            .writes
            .insert(key.to_string(), Some(value));
        Ok(())
    }

    /// Stage a private delete.
    pub fn del_private_data(&mut self, collection: &CollectionName, key: &str) -> Result<()> {
        self.collections.ensure_defined(collection)?;
        validate_key(key)?;
        self.rwset
            .private
            .entry(collection.clone())
            .or_default()
            .writes
            .insert(key.to_string(), None);
        Ok(())
    }

    /// Read/write set accumulated so far.
    #[must_use]
    pub fn rwset(&self) -> &TxRwSet {
        &self.rwset
    }

    pub(crate) fn into_rwset(self) -> TxRwSet {
        self.rwset
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(PrivassetError::invalid_input("ledger key must be non-empty"));
    }
    // Composite keys are well-formed only if they carry the closing delimiter.
    if key.starts_with(constants::COMPOSITE_KEY_NAMESPACE)
        && !key.ends_with(constants::MIN_UNICODE_RUNE)
    {
        return Err(PrivassetError::invalid_input(format!("malformed composite key {key:?}")));
    }
    Ok(())
}

/// Lazy range scan over a snapshot. Yields `(key, value)` in ascending order.
pub struct StateRange<'c> {
    inner: Box<dyn Iterator<Item = (&'c String, &'c VersionedValue)> + 'c>,
    info: &'c mut RangeQueryInfo,
}

impl Iterator for StateRange<'_> {
    type Item = (String, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((key, value)) = self.inner.next() {
            self.info.reads.push((key.clone(), value.version));
            Some((key.clone(), value.value.clone()))
        } else {
            self.info.exhausted = true;
            None
        }
    }
}
