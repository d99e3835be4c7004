//! The ledger: world state, membership and the block log behind one lock.
//!
//! Simulation holds a read lock for its duration, so any number of
//! evaluations and endorsements run side by side against a stable snapshot.
//! Commit takes the write lock, validates the read set against the current
//! state, then applies every write and appends a block. A transaction is
//! either committed whole or not at all.

use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ed25519_dalek::VerifyingKey;
use privasset_types::{NetworkConfig, OrgId, PrivassetError, Result, TxId};

use crate::block::{Block, CommitStatus, TransactionRecord};
use crate::chaincode::Chaincode;
use crate::collection::CollectionRegistry;
use crate::context::{TransientMap, TxContext};
use crate::msp::MembershipRegistry;
use crate::proposal::{Proposal, SignedProposal};
use crate::rwset::TxRwSet;
use crate::state::{Height, WorldState};

/// Outcome of simulating a proposal: the chaincode result and the
/// read/write set to be committed.
#[derive(Debug, Clone)]
pub struct Simulation<T> {
    pub proposal: Proposal,
    pub peer_org: OrgId,
    pub result: T,
    pub rwset: TxRwSet,
}

#[derive(Default)]
struct Inner {
    state: WorldState,
    blocks: Vec<Block>,
    committed: BTreeSet<TxId>,
}

/// Shared ledger for one channel.
pub struct Ledger {
    config: NetworkConfig,
    collections: CollectionRegistry,
    msp: RwLock<MembershipRegistry>,
    inner: RwLock<Inner>,
}

impl Ledger {
    /// Create an empty ledger for the given channel layout.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        let collections = CollectionRegistry::from_config(&config);
        tracing::info!(
            channel = %config.channel,
            chaincode = %config.chaincode,
            orgs = config.organizations.len(),
            "Ledger initialized"
        );
        Ok(Self {
            config,
            collections,
            msp: RwLock::new(MembershipRegistry::new()),
            inner: RwLock::new(Inner::default()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Register the verifying key that speaks for `org`.
    pub fn register_org(&self, org: OrgId, key: VerifyingKey) -> Result<()> {
        if self.config.org(&org).is_none() {
            return Err(PrivassetError::UnknownOrganization(org));
        }
        self.msp
            .write()
            .map_err(|_| PrivassetError::Internal("membership lock poisoned".into()))?
            .register(org, key);
        Ok(())
    }

    fn read_inner(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| PrivassetError::Internal("ledger lock poisoned".into()))
    }

    fn write_inner(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| PrivassetError::Internal("ledger lock poisoned".into()))
    }

    /// Run `f` against a snapshot of committed state. Nothing is applied.
    pub fn simulate<T, F>(
        &self,
        proposal: Proposal,
        peer_org: &OrgId,
        transient: TransientMap,
        f: F,
    ) -> Result<Simulation<T>>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T>,
    {
        if proposal.channel != self.config.channel {
            return Err(PrivassetError::invalid_input(format!(
                "proposal targets channel {:?}, ledger serves {:?}",
                proposal.channel, self.config.channel
            )));
        }
        if self.config.org(peer_org).is_none() {
            return Err(PrivassetError::UnknownOrganization(peer_org.clone()));
        }

        let inner = self.read_inner()?;
        let mut ctx = TxContext::new(
            &proposal,
            peer_org.clone(),
            transient,
            &inner.state,
            &self.collections,
        );
        let result = f(&mut ctx)?;
        let rwset = ctx.into_rwset();
        drop(inner);

        tracing::debug!(
            tx_id = %proposal.tx_id,
            function = %proposal.function,
            peer_org = %peer_org,
            writes = rwset.write_count(),
            "Simulation complete"
        );

        Ok(Simulation {
            proposal,
            peer_org: peer_org.clone(),
            result,
            rwset,
        })
    }

    /// Verify the proposal signature and simulate the chaincode on a peer of
    /// `peer_org`.
    pub fn endorse(
        &self,
        signed: SignedProposal,
        transient: TransientMap,
        peer_org: &OrgId,
        chaincode: &dyn Chaincode,
    ) -> Result<Simulation<Vec<u8>>> {
        self.msp
            .read()
            .map_err(|_| PrivassetError::Internal("membership lock poisoned".into()))?
            .verify(&signed)?;
        let proposal = signed.proposal;
        if proposal.chaincode != self.config.chaincode {
            return Err(PrivassetError::invalid_input(format!(
                "chaincode {:?} is not installed on channel {:?}",
                proposal.chaincode, self.config.channel
            )));
        }
        let function = proposal.function.clone();
        let args = proposal.args.clone();
        self.simulate(proposal, peer_org, transient, |ctx| {
            chaincode.invoke(ctx, &function, &args)
        })
    }

    /// Endorse without committing; returns the result payload.
    pub fn evaluate(
        &self,
        signed: SignedProposal,
        peer_org: &OrgId,
        chaincode: &dyn Chaincode,
    ) -> Result<Vec<u8>> {
        Ok(self
            .endorse(signed, TransientMap::new(), peer_org, chaincode)?
            .result)
    }

    /// Validate the read set against current state and apply the writes.
    ///
    /// # Errors
    /// - `MvccReadConflict` if any key or range read changed since simulation
    /// - `InvalidInput` if this transaction id was already committed
    pub fn commit<T>(&self, simulation: &Simulation<T>) -> Result<CommitStatus> {
        let proposal = &simulation.proposal;
        let mut inner = self.write_inner()?;

        if inner.committed.contains(&proposal.tx_id) {
            return Err(PrivassetError::invalid_input(format!(
                "{} was already committed",
                proposal.tx_id
            )));
        }

        if let Err(err) = validate_reads(&inner.state, &simulation.rwset) {
            tracing::warn!(
                tx_id = %proposal.tx_id,
                function = %proposal.function,
                error = %err,
                "Transaction invalidated at commit"
            );
            return Err(err);
        }

        let number = inner.blocks.len() as u64 + 1;
        let height = Height::new(number, 0);
        apply_writes(&mut inner.state, &simulation.rwset, height);

        let record = TransactionRecord {
            tx_id: proposal.tx_id,
            creator: proposal.creator.clone(),
            function: proposal.function.clone(),
            args: proposal.args.clone(),
            timestamp: proposal.timestamp,
            public_writes: simulation
                .rwset
                .public
                .writes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            private_write_hashes: simulation.rwset.private_write_hashes(),
        };
        let previous_hash = inner.blocks.last().map_or([0u8; 32], |b| b.data_hash);
        let block = Block::seal(number, previous_hash, record)?;

        tracing::info!(
            tx_id = %proposal.tx_id,
            block = number,
            function = %proposal.function,
            creator = %proposal.creator,
            writes = simulation.rwset.write_count(),
            data_hash = hex::encode(block.data_hash),
            "Transaction committed"
        );

        inner.blocks.push(block);
        inner.committed.insert(proposal.tx_id);
        Ok(CommitStatus {
            tx_id: proposal.tx_id,
            block_number: number,
        })
    }

    /// Number of committed blocks.
    pub fn height(&self) -> Result<u64> {
        Ok(self.read_inner()?.blocks.len() as u64)
    }

    /// Committed block by number (first block is 1).
    pub fn block(&self, number: u64) -> Result<Option<Block>> {
        let inner = self.read_inner()?;
        let index = usize::try_from(number.wrapping_sub(1)).ok();
        Ok(index.and_then(|i| inner.blocks.get(i)).cloned())
    }

    /// Check every block's hash and its link to the previous block.
    pub fn verify_chain(&self) -> Result<bool> {
        let inner = self.read_inner()?;
        let mut previous = [0u8; 32];
        for block in &inner.blocks {
            if block.previous_hash != previous || !block.verify() {
                return Ok(false);
            }
            previous = block.data_hash;
        }
        Ok(true)
    }
}

fn conflict(key: &str) -> PrivassetError {
    PrivassetError::MvccReadConflict {
        key: format!("{key:?}"),
    }
}

fn validate_reads(state: &WorldState, rwset: &TxRwSet) -> Result<()> {
    for (key, version) in &rwset.public.reads {
        if state.get_public(key).map(|v| v.version) != *version {
            return Err(conflict(key));
        }
    }

    for query in &rwset.public.range_queries {
        let current = state
            .public_range(query.bounds())
            .map(|(k, v)| (k.clone(), v.version));
        let current: Vec<_> = if query.exhausted {
            current.collect()
        } else {
            current.take(query.reads.len()).collect()
        };
        if current != query.reads {
            return Err(PrivassetError::MvccReadConflict {
                key: format!(
                    "range [{:?}, {:?})",
                    query.start,
                    query.end.as_deref().unwrap_or("")
                ),
            });
        }
    }

    for (collection, set) in &rwset.private {
        for (key, version) in &set.reads {
            if state.get_private(collection, key).map(|v| v.version) != *version {
                return Err(PrivassetError::MvccReadConflict {
                    key: format!("{collection}/{key:?}"),
                });
            }
        }
    }
    Ok(())
}

fn apply_writes(state: &mut WorldState, rwset: &TxRwSet, height: Height) {
    for (key, value) in &rwset.public.writes {
        match value {
            Some(v) => state.put_public(key.clone(), v.clone(), height),
            None => state.delete_public(key),
        }
    }
    for (collection, set) in &rwset.private {
        for (key, value) in &set.writes {
            match value {
                Some(v) => state.put_private(collection, key.clone(), v.clone(), height),
                None => state.delete_private(collection, key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org1() -> OrgId {
        OrgId::new("Org1MSP")
    }

    fn ledger() -> Ledger {
        Ledger::new(NetworkConfig::two_orgs()).unwrap()
    }

    fn proposal(function: &str) -> Proposal {
        Proposal::new("mychannel", "private", org1(), function, vec![])
    }

    fn put(ledger: &Ledger, key: &str, value: &[u8]) -> CommitStatus {
        let sim = ledger
            .simulate(proposal("put"), &org1(), TransientMap::new(), |ctx| {
                ctx.put_state(key, value.to_vec())
            })
            .unwrap();
        ledger.commit(&sim).unwrap()
    }

    fn get(ledger: &Ledger, key: &str) -> Option<Vec<u8>> {
        ledger
            .simulate(proposal("get"), &org1(), TransientMap::new(), |ctx| {
                ctx.get_state(key)
            })
            .unwrap()
            .result
    }

    #[test]
    fn commit_applies_writes() {
        let ledger = ledger();
        let status = put(&ledger, "k", b"v");
        assert_eq!(status.block_number, 1);
        assert_eq!(get(&ledger, "k"), Some(b"v".to_vec()));
        assert_eq!(ledger.height().unwrap(), 1);
    }

    #[test]
    fn simulation_alone_changes_nothing() {
        let ledger = ledger();
        ledger
            .simulate(proposal("put"), &org1(), TransientMap::new(), |ctx| {
                ctx.put_state("k", b"v".to_vec())
            })
            .unwrap();
        assert_eq!(get(&ledger, "k"), None);
        assert_eq!(ledger.height().unwrap(), 0);
    }

    #[test]
    fn reads_do_not_see_own_writes() {
        let ledger = ledger();
        let sim = ledger
            .simulate(proposal("rw"), &org1(), TransientMap::new(), |ctx| {
                ctx.put_state("k", b"v".to_vec())?;
                ctx.get_state("k")
            })
            .unwrap();
        assert_eq!(sim.result, None);
    }

    #[test]
    fn stale_read_rejected() {
        let ledger = ledger();
        put(&ledger, "k", b"v1");

        let stale = ledger
            .simulate(proposal("rw"), &org1(), TransientMap::new(), |ctx| {
                let v = ctx.get_state("k")?.unwrap_or_default();
                ctx.put_state("k", [v.as_slice(), b"+1"].concat())
            })
            .unwrap();
        put(&ledger, "k", b"v2");

        let err = ledger.commit(&stale).unwrap_err();
        assert!(err.is_retryable(), "got {err:?}");
        assert_eq!(get(&ledger, "k"), Some(b"v2".to_vec()));
    }

    #[test]
    fn double_commit_rejected() {
        let ledger = ledger();
        let sim = ledger
            .simulate(proposal("put"), &org1(), TransientMap::new(), |ctx| {
                ctx.put_state("k", b"v".to_vec())
            })
            .unwrap();
        ledger.commit(&sim).unwrap();
        assert!(matches!(
            ledger.commit(&sim).unwrap_err(),
            PrivassetError::InvalidInput { .. }
        ));
    }

    #[test]
    fn wrong_channel_rejected() {
        let ledger = ledger();
        let p = Proposal::new("otherchannel", "private", org1(), "get", vec![]);
        let err = ledger
            .simulate(p, &org1(), TransientMap::new(), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, PrivassetError::InvalidInput { .. }));
    }

    #[test]
    fn unknown_peer_org_rejected() {
        let ledger = ledger();
        let err = ledger
            .simulate(proposal("get"), &OrgId::new("Org3MSP"), TransientMap::new(), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, PrivassetError::UnknownOrganization(_)));
    }

    #[test]
    fn chain_links_verify() {
        let ledger = ledger();
        put(&ledger, "a", b"1");
        put(&ledger, "b", b"2");
        put(&ledger, "a", b"3");
        assert!(ledger.verify_chain().unwrap());
        let b2 = ledger.block(2).unwrap().unwrap();
        let b1 = ledger.block(1).unwrap().unwrap();
        assert_eq!(b2.previous_hash, b1.data_hash);
        assert!(ledger.block(0).unwrap().is_none());
        assert!(ledger.block(4).unwrap().is_none());
    }

    #[test]
    fn register_unknown_org_rejected() {
        let ledger = ledger();
        let key = ed25519_dalek::SigningKey::from_bytes(&[9; 32]).verifying_key();
        assert!(ledger.register_org(OrgId::new("Org9MSP"), key).is_err());
        ledger.register_org(org1(), key).unwrap();
    }
}
