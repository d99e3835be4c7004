//! Transfer agreement records and the value commitment scheme.
//!
//! A buyer never reveals its declared value to the seller, and the seller
//! never reveals its appraisal to the buyer. Both sides instead compute the
//! same one-way [`ValueCommitment`] over `(asset_id, value)`. The buyer's
//! commitment is published on the public ledger; at transfer time the seller
//! recomputes it from its own private appraisal and compares.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::{AssetId, OrgId, PrivassetError, Result, constants};

/// SHA-256 commitment to a declared or appraised value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueCommitment(pub [u8; 32]);

impl ValueCommitment {
    /// Deterministic commitment to `value` for `asset_id`.
    ///
    /// Format: `"privasset:commitment:v1:" || len(asset_id) u64 LE || asset_id || value u64 LE`
    #[must_use]
    pub fn compute(asset_id: &AssetId, value: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(constants::COMMITMENT_DOMAIN);
        hasher.update((asset_id.as_str().len() as u64).to_le_bytes());
        hasher.update(asset_id.as_str().as_bytes());
        hasher.update(value.to_le_bytes());
        Self(hasher.finalize().into())
    }

    /// Does this commitment open to `value` for `asset_id`?
    #[must_use]
    pub fn matches(&self, asset_id: &AssetId, value: u64) -> bool {
        Self::compute(asset_id, value) == *self
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| PrivassetError::Serialization(format!("commitment hex: {e}")))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            PrivassetError::Serialization(format!("commitment must be 32 bytes, got {}", b.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for ValueCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ValueCommitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ValueCommitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Public record of an outstanding agreement. Carries only the commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAgreement {
    #[serde(rename = "assetID")]
    pub asset_id: AssetId,
    #[serde(rename = "buyerOrg")]
    pub buyer_org: OrgId,
    #[serde(rename = "valueCommitment")]
    pub value_commitment: ValueCommitment,
}

/// The buyer's raw declared value, kept only in the buyer's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerBid {
    #[serde(rename = "assetID")]
    pub asset_id: AssetId,
    #[serde(rename = "appraisedValue")]
    pub appraised_value: u64,
}
