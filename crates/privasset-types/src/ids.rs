//! Identifiers used throughout privasset.
//!
//! Asset IDs are caller-supplied strings; the core never generates them.
//! Transaction IDs are UUIDv7, minted by the gateway before a proposal is
//! signed, never inside a state-changing operation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PrivassetError, Result, constants};

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Caller-supplied asset identifier. Immutable once the asset exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Validate and wrap a raw asset ID.
    ///
    /// Rejects empty IDs, IDs containing the composite-key delimiter (a
    /// simple key could alias a composite one) and IDs containing U+10FFFF,
    /// which composite keys reserve as the scan upper bound.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PrivassetError::InvalidInput {
                reason: "assetID must be a non-empty string".to_string(),
            });
        }
        if raw.contains(constants::COMPOSITE_KEY_NAMESPACE) {
            return Err(PrivassetError::InvalidInput {
                reason: format!("assetID {raw:?} contains a U+0000 delimiter"),
            });
        }
        if raw.contains(constants::MAX_UNICODE_RUNE) {
            return Err(PrivassetError::InvalidInput {
                reason: format!("assetID {raw:?} contains reserved code point U+10FFFF"),
            });
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// OrgId
// ---------------------------------------------------------------------------

/// Organization (MSP) identifier, e.g. `Org1MSP`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    #[must_use]
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self(msp_id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Conventional name of this organization's private collection.
    #[must_use]
    pub fn default_private_collection(&self) -> CollectionName {
        CollectionName(format!("{}{}", self.0, constants::PRIVATE_COLLECTION_SUFFIX))
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// CollectionName
// ---------------------------------------------------------------------------

/// Name of a private data collection (one partition of the private store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(String);

impl CollectionName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// TxId
// ---------------------------------------------------------------------------

/// Transaction identifier. UUIDv7, so ids sort by submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TxId(pub Uuid);

impl TxId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx:{}", self.0)
    }
}
