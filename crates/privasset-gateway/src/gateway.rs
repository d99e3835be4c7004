//! Gateway: one organization's connection to a peer.
//!
//! ## Submit
//!
//! 1. Build a proposal (fresh tx id, current time, creator = identity org)
//! 2. Sign it
//! 3. Endorse on the peer: signature check, then simulation
//! 4. Commit the read/write set
//!
//! If commit reports an MVCC read conflict, the whole sequence is repeated
//! with a new proposal, up to `GatewayConfig::max_commit_attempts` times.
//! Every other error is returned as is.

use std::sync::Arc;

use privasset_ledger::{Chaincode, Ledger, Proposal, TransientMap};
use privasset_types::{GatewayConfig, OrgId, PrivassetError, Result};

use crate::identity::Identity;

/// A client identity bound to one peer of the network.
pub struct Gateway {
    ledger: Arc<Ledger>,
    identity: Identity,
    peer_org: OrgId,
    config: GatewayConfig,
}

impl Gateway {
    /// Connect `identity` to a peer run by `peer_org`.
    ///
    /// # Errors
    /// - `UnknownOrganization` if `peer_org` is not on the channel
    /// - `Configuration` if `max_commit_attempts` is zero
    pub fn connect(
        ledger: Arc<Ledger>,
        identity: Identity,
        peer_org: OrgId,
        config: GatewayConfig,
    ) -> Result<Self> {
        if ledger.config().org(&peer_org).is_none() {
            return Err(PrivassetError::UnknownOrganization(peer_org));
        }
        if config.max_commit_attempts == 0 {
            return Err(PrivassetError::Configuration(
                "max_commit_attempts must be at least 1".into(),
            ));
        }
        tracing::info!(
            client_org = %identity.org(),
            peer_org = %peer_org,
            channel = %ledger.config().channel,
            "Gateway connected"
        );
        Ok(Self {
            ledger,
            identity,
            peer_org,
            config,
        })
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn peer_org(&self) -> &OrgId {
        &self.peer_org
    }

    /// Handle on the chaincode installed on this channel.
    #[must_use]
    pub fn contract(&self, chaincode: Arc<dyn Chaincode>) -> Contract<'_> {
        Contract {
            gateway: self,
            name: self.ledger.config().chaincode.clone(),
            chaincode,
        }
    }

    fn proposal(&self, chaincode: &str, function: &str, args: &[&str]) -> Proposal {
        Proposal::new(
            self.ledger.config().channel.clone(),
            chaincode,
            self.identity.org().clone(),
            function,
            args.iter().map(|a| (*a).to_string()).collect(),
        )
    }
}

/// Submit / evaluate handle for one chaincode.
pub struct Contract<'g> {
    gateway: &'g Gateway,
    name: String,
    chaincode: Arc<dyn Chaincode>,
}

impl Contract<'_> {
    /// Endorse and commit. Blocks until committed and returns the function's
    /// result bytes (empty for pure writes).
    pub fn submit_transaction(
        &self,
        function: &str,
        args: &[&str],
        transient: TransientMap,
    ) -> Result<Vec<u8>> {
        let max_attempts = self.gateway.config.max_commit_attempts;
        let mut attempt = 1;
        loop {
            match self.submit_once(function, args, transient.clone()) {
                Err(err) if should_retry(&err, attempt, max_attempts) => {
                    tracing::warn!(
                        function = %function,
                        attempt,
                        max_attempts,
                        error = %err,
                        "Commit conflict, re-endorsing"
                    );
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    fn submit_once(
        &self,
        function: &str,
        args: &[&str],
        transient: TransientMap,
    ) -> Result<Vec<u8>> {
        let gateway = self.gateway;
        let signed = gateway
            .identity
            .sign(gateway.proposal(&self.name, function, args));
        let simulation = gateway.ledger.endorse(
            signed,
            transient,
            &gateway.peer_org,
            self.chaincode.as_ref(),
        )?;
        let status = gateway.ledger.commit(&simulation)?;
        tracing::debug!(
            tx_id = %status.tx_id,
            block = status.block_number,
            function = %function,
            "Submit complete"
        );
        Ok(simulation.result)
    }

    /// Simulate on the peer without committing.
    pub fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>> {
        let gateway = self.gateway;
        let signed = gateway
            .identity
            .sign(gateway.proposal(&self.name, function, args));
        gateway
            .ledger
            .evaluate(signed, &gateway.peer_org, self.chaincode.as_ref())
    }
}

fn should_retry(err: &PrivassetError, attempt: u32, max_attempts: u32) -> bool {
    err.is_retryable() && attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use privasset_types::{AssetId, NetworkConfig};

    use super::*;

    fn conflict() -> PrivassetError {
        PrivassetError::MvccReadConflict {
            key: "asset1".into(),
        }
    }

    #[test]
    fn retry_only_conflicts_within_budget() {
        assert!(should_retry(&conflict(), 1, 3));
        assert!(should_retry(&conflict(), 2, 3));
        assert!(!should_retry(&conflict(), 3, 3));
        assert!(!should_retry(&conflict(), 1, 1));
        let mismatch = PrivassetError::AgreementMismatch(AssetId::parse("asset1").unwrap());
        assert!(!should_retry(&mismatch, 1, 3));
    }

    #[test]
    fn connect_rejects_unknown_peer() {
        let ledger = Arc::new(Ledger::new(NetworkConfig::two_orgs()).unwrap());
        let identity = Identity::generate(OrgId::new("Org1MSP"));
        let err = Gateway::connect(
            ledger,
            identity,
            OrgId::new("Org5MSP"),
            GatewayConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PrivassetError::UnknownOrganization(_)));
    }

    #[test]
    fn connect_rejects_zero_attempts() {
        let ledger = Arc::new(Ledger::new(NetworkConfig::two_orgs()).unwrap());
        let identity = Identity::generate(OrgId::new("Org1MSP"));
        let config = GatewayConfig {
            max_commit_attempts: 0,
            ..GatewayConfig::default()
        };
        let err = Gateway::connect(ledger, identity, OrgId::new("Org1MSP"), config)
            .err()
            .unwrap();
        assert!(matches!(err, PrivassetError::Configuration(_)));
    }
}
