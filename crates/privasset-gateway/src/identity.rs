//! Client identities: an organization plus its ed25519 signing key.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use privasset_ledger::{Proposal, SignedProposal};
use privasset_types::OrgId;

/// A client identity that signs proposals on behalf of one organization.
pub struct Identity {
    org: OrgId,
    signing_key: SigningKey,
}

impl Identity {
    #[must_use]
    pub fn new(org: OrgId, signing_key: SigningKey) -> Self {
        Self { org, signing_key }
    }

    /// Identity from a raw 32-byte ed25519 secret.
    #[must_use]
    pub fn from_secret_bytes(org: OrgId, secret: &[u8; 32]) -> Self {
        Self::new(org, SigningKey::from_bytes(secret))
    }

    #[must_use]
    pub fn org(&self) -> &OrgId {
        &self.org
    }

    /// Key the ledger's membership registry must hold for this organization.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign `proposal`. The proposal's creator must be this identity's org.
    #[must_use]
    pub fn sign(&self, proposal: Proposal) -> SignedProposal {
        let signature = self
            .signing_key
            .sign(&proposal.signing_bytes())
            .to_bytes()
            .to_vec();
        SignedProposal {
            proposal,
            signature,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("org", &self.org)
            .field("verifying_key", &hex::encode(self.verifying_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    /// Fresh identity with a random key.
    pub fn generate(org: OrgId) -> Self {
        Self::new(org, SigningKey::from_bytes(&rand::random::<[u8; 32]>()))
    }
}
