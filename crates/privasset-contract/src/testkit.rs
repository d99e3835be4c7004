//! Shared fixtures for unit tests: a two-org ledger and run/eval shorthands.

use privasset_ledger::{Ledger, Proposal, TransientMap, TxContext};
use privasset_types::{NetworkConfig, OrgId, Result};

pub(crate) fn org1() -> OrgId {
    OrgId::new("Org1MSP")
}

pub(crate) fn org2() -> OrgId {
    OrgId::new("Org2MSP")
}

pub(crate) fn network() -> NetworkConfig {
    NetworkConfig::two_orgs()
}

pub(crate) fn ledger() -> Ledger {
    Ledger::new(network()).unwrap()
}

fn proposal(caller: &OrgId) -> Proposal {
    Proposal::new("mychannel", "private", caller.clone(), "test", vec![])
}

/// Simulate on `caller`'s own peer and commit.
pub(crate) fn run<T>(
    ledger: &Ledger,
    caller: &OrgId,
    f: impl FnOnce(&mut TxContext<'_>) -> Result<T>,
) -> Result<T> {
    let sim = ledger.simulate(proposal(caller), caller, TransientMap::new(), f)?;
    ledger.commit(&sim)?;
    Ok(sim.result)
}

/// Simulate on a peer of `peer`, without committing.
pub(crate) fn eval<T>(
    ledger: &Ledger,
    caller: &OrgId,
    peer: &OrgId,
    f: impl FnOnce(&mut TxContext<'_>) -> Result<T>,
) -> Result<T> {
    Ok(ledger
        .simulate(proposal(caller), peer, TransientMap::new(), f)?
        .result)
}
