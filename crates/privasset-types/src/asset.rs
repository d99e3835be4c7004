//! Asset records: the public ledger entry and the private detail record.
//!
//! ## Lifecycle
//!
//! ```text
//!              AgreeToTransfer
//!   ┌─────────┐ ───────────────▶ ┌──────────────────┐
//!   │ CREATED │                  │ AGREEMENT_PENDING │◀─┐ re-declare
//!   └────┬────┘ ◀─────────────── └─────────┬────────┘──┘
//!        │      TransferAsset /            │
//!        │      DeleteTransferAgreement    │ (DeleteAsset blocked)
//!        │ DeleteAsset                     ✕
//!        ▼
//!   ┌─────────┐
//!   │ DELETED │  terminal
//!   └─────────┘
//! ```
//!
//! State is never stored. It is derived from which records exist: an asset
//! record alone is `Created`, an asset record plus a published commitment is
//! `AgreementPending`, no asset record is `Deleted`.

use serde::{Deserialize, Serialize};

use crate::{AssetId, OrgId};

/// Public asset record, visible to every organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Record kind tag, lets differently-shaped records share a key range.
    #[serde(rename = "objectType")]
    pub object_type: String,
    #[serde(rename = "assetID")]
    pub asset_id: AssetId,
    /// Organization currently holding the asset.
    #[serde(rename = "ownerOrg")]
    pub owner_org: OrgId,
}

/// Confidential attributes of an asset, held only in the owner's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPrivateDetails {
    #[serde(rename = "assetID")]
    pub asset_id: AssetId,
    pub color: String,
    pub size: u32,
    #[serde(rename = "appraisedValue")]
    pub appraised_value: u64,
}

/// Derived lifecycle state of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetState {
    /// Asset exists with no outstanding transfer agreement.
    Created,
    /// A prospective buyer has published a value commitment.
    AgreementPending,
    /// Asset and its private details are gone. Terminal.
    Deleted,
}

impl AssetState {
    /// Can the asset move from this state to `target`?
    ///
    /// `AgreementPending → Deleted` is refused: the buyer must withdraw first.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::AgreementPending | Self::Deleted)
                | (Self::AgreementPending, Self::AgreementPending | Self::Created)
        )
    }
}

impl std::fmt::Display for AssetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::AgreementPending => write!(f, "AGREEMENT_PENDING"),
            Self::Deleted => write!(f, "DELETED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_json_field_names() {
        let asset = Asset {
            object_type: "asset".into(),
            asset_id: AssetId::parse("asset1").unwrap(),
            owner_org: OrgId::new("Org1MSP"),
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["objectType"], "asset");
        assert_eq!(json["assetID"], "asset1");
        assert_eq!(json["ownerOrg"], "Org1MSP");
    }

    #[test]
    fn private_details_json_field_names() {
        let details = AssetPrivateDetails {
            asset_id: AssetId::parse("asset1").unwrap(),
            color: "green".into(),
            size: 20,
            appraised_value: 100,
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["appraisedValue"], 100);
        assert_eq!(json["color"], "green");
    }

    #[test]
    fn transitions_valid() {
        assert!(AssetState::Created.can_transition_to(AssetState::AgreementPending));
        assert!(AssetState::Created.can_transition_to(AssetState::Deleted));
        assert!(AssetState::AgreementPending.can_transition_to(AssetState::Created));
        assert!(AssetState::AgreementPending.can_transition_to(AssetState::AgreementPending));
    }

    #[test]
    fn transitions_invalid() {
        assert!(!AssetState::AgreementPending.can_transition_to(AssetState::Deleted));
        assert!(!AssetState::Deleted.can_transition_to(AssetState::Created));
        assert!(!AssetState::Deleted.can_transition_to(AssetState::AgreementPending));
        assert!(!AssetState::Created.can_transition_to(AssetState::Created));
    }

    #[test]
    fn state_display() {
        assert_eq!(AssetState::AgreementPending.to_string(), "AGREEMENT_PENDING");
    }
}
