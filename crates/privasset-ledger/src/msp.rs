//! Membership registry: which ed25519 key speaks for which organization.
//!
//! Credential issuance happens elsewhere. The ledger only needs each
//! organization's verifying key to establish the creator of a proposal.

use std::collections::BTreeMap;

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use privasset_types::{OrgId, PrivassetError, Result};

use crate::proposal::SignedProposal;

/// Registered organization keys.
#[derive(Debug, Clone, Default)]
pub struct MembershipRegistry {
    keys: BTreeMap<OrgId, VerifyingKey>,
}

impl MembershipRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or rotate) the key for an organization.
    pub fn register(&mut self, org: OrgId, key: VerifyingKey) {
        self.keys.insert(org, key);
    }

    /// Verify that `signed` was produced by its claimed creator organization.
    ///
    /// # Errors
    /// - `UnknownOrganization` if no key is registered for the creator
    /// - `InvalidSignature` if the signature is malformed or does not verify
    pub fn verify(&self, signed: &SignedProposal) -> Result<()> {
        let creator = &signed.proposal.creator;
        let key = self
            .keys
            .get(creator)
            .ok_or_else(|| PrivassetError::UnknownOrganization(creator.clone()))?;
        let signature = Signature::from_slice(&signed.signature)
            .map_err(|_| PrivassetError::InvalidSignature(creator.clone()))?;
        key.verify(&signed.proposal.signing_bytes(), &signature)
            .map_err(|_| PrivassetError::InvalidSignature(creator.clone()))
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};

    use super::*;
    use crate::proposal::Proposal;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn signed_by(signer: &SigningKey, creator: &str) -> SignedProposal {
        let proposal = Proposal::new(
            "mychannel",
            "private",
            OrgId::new(creator),
            "ReadAsset",
            vec![],
        );
        let signature = signer.sign(&proposal.signing_bytes()).to_bytes().to_vec();
        SignedProposal { proposal, signature }
    }

    #[test]
    fn valid_signature_accepted() {
        let mut msp = MembershipRegistry::new();
        let org1 = key(1);
        msp.register(OrgId::new("Org1MSP"), org1.verifying_key());
        msp.verify(&signed_by(&org1, "Org1MSP")).unwrap();
    }

    #[test]
    fn impersonation_rejected() {
        let mut msp = MembershipRegistry::new();
        msp.register(OrgId::new("Org1MSP"), key(1).verifying_key());
        msp.register(OrgId::new("Org2MSP"), key(2).verifying_key());
        // Org2's key claiming to be Org1.
        let err = msp.verify(&signed_by(&key(2), "Org1MSP")).unwrap_err();
        assert!(matches!(err, PrivassetError::InvalidSignature(_)));
    }

    #[test]
    fn unknown_creator_rejected() {
        let msp = MembershipRegistry::new();
        let err = msp.verify(&signed_by(&key(1), "Org1MSP")).unwrap_err();
        assert!(matches!(err, PrivassetError::UnknownOrganization(_)));
    }

    #[test]
    fn tampered_proposal_rejected() {
        let mut msp = MembershipRegistry::new();
        let org1 = key(1);
        msp.register(OrgId::new("Org1MSP"), org1.verifying_key());
        let mut signed = signed_by(&org1, "Org1MSP");
        signed.proposal.function = "DeleteAsset".into();
        assert!(msp.verify(&signed).is_err());
    }

    #[test]
    fn truncated_signature_rejected() {
        let mut msp = MembershipRegistry::new();
        let org1 = key(1);
        msp.register(OrgId::new("Org1MSP"), org1.verifying_key());
        let mut signed = signed_by(&org1, "Org1MSP");
        signed.signature.truncate(10);
        assert!(matches!(
            msp.verify(&signed).unwrap_err(),
            PrivassetError::InvalidSignature(_)
        ));
    }
}
