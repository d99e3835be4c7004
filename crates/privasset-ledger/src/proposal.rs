//! Transaction proposals.
//!
//! A proposal names the invocation (function and positional arguments) and
//! its creator organization. The transient map travels beside the proposal,
//! never inside it, so it is neither signed nor recorded.

use chrono::{DateTime, Utc};
use privasset_types::{OrgId, TxId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An unsigned invocation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub tx_id: TxId,
    pub channel: String,
    pub chaincode: String,
    /// Organization of the submitting client identity.
    pub creator: OrgId,
    pub function: String,
    pub args: Vec<String>,
    /// Client-side creation time, carried so the contract never reads a clock.
    pub timestamp: DateTime<Utc>,
}

impl Proposal {
    /// Build a proposal with a fresh transaction id and the current time.
    #[must_use]
    pub fn new(
        channel: impl Into<String>,
        chaincode: impl Into<String>,
        creator: OrgId,
        function: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            tx_id: TxId::new(),
            channel: channel.into(),
            chaincode: chaincode.into(),
            creator,
            function: function.into(),
            args,
            timestamp: Utc::now(),
        }
    }

    /// Canonical bytes covered by the creator's signature.
    ///
    /// Format: SHA-256 of `"privasset:proposal:v1:"` followed by every field,
    /// each string prefixed with its length.
    #[must_use]
    pub fn signing_bytes(&self) -> [u8; 32] {
        fn put(hasher: &mut Sha256, s: &str) {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
        let mut hasher = Sha256::new();
        hasher.update(b"privasset:proposal:v1:");
        hasher.update(self.tx_id.0.as_bytes());
        put(&mut hasher, &self.channel);
        put(&mut hasher, &self.chaincode);
        put(&mut hasher, self.creator.as_str());
        put(&mut hasher, &self.function);
        hasher.update((self.args.len() as u64).to_le_bytes());
        for arg in &self.args {
            put(&mut hasher, arg);
        }
        hasher.update(self.timestamp.timestamp_micros().to_le_bytes());
        hasher.finalize().into()
    }
}

/// A proposal plus the creator's ed25519 signature over
/// [`Proposal::signing_bytes`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedProposal {
    pub proposal: Proposal,
    pub signature: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(
            "mychannel",
            "private",
            OrgId::new("Org1MSP"),
            "ReadAsset",
            vec!["asset1".into()],
        )
    }

    #[test]
    fn signing_bytes_deterministic() {
        let p = proposal();
        assert_eq!(p.signing_bytes(), p.signing_bytes());
    }

    #[test]
    fn signing_bytes_cover_args() {
        let p = proposal();
        let mut q = p.clone();
        q.args = vec!["asset2".into()];
        assert_ne!(p.signing_bytes(), q.signing_bytes());
    }

    #[test]
    fn arg_boundaries_are_unambiguous() {
        let mut p = proposal();
        p.args = vec!["ab".into(), "c".into()];
        let mut q = p.clone();
        q.args = vec!["a".into(), "bc".into()];
        assert_ne!(p.signing_bytes(), q.signing_bytes());
    }

    #[test]
    fn fresh_proposals_have_distinct_tx_ids() {
        assert_ne!(proposal().tx_id, proposal().tx_id);
    }
}
