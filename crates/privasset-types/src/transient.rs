//! Confidential (transient) payloads supplied alongside write transactions.
//!
//! Transient data is used during execution but is never part of the signed
//! proposal bytes or the recorded transaction. Each payload is a JSON object
//! decoded into a loose `*Input` shape (every field optional, numbers signed)
//! and then validated into a strongly-typed request. Validation reports the
//! first offending field as [`PrivassetError::InvalidInput`].

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{AssetId, AssetPrivateDetails, OrgId, PrivassetError, Result};

/// Decode a transient JSON payload, mapping decode failures to `InvalidInput`.
pub fn decode_transient<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        PrivassetError::invalid_input(format!("transient {key:?} is not valid JSON: {e}"))
    })
}

fn required<T>(field: Option<T>, name: &str) -> Result<T> {
    field.ok_or_else(|| PrivassetError::invalid_input(format!("{name} field must be present")))
}

fn non_empty(field: Option<String>, name: &str) -> Result<String> {
    let value = required(field, name)?;
    if value.is_empty() {
        return Err(PrivassetError::invalid_input(format!(
            "{name} field must be a non-empty string"
        )));
    }
    Ok(value)
}

fn positive(field: Option<i64>, name: &str) -> Result<u64> {
    let value = required(field, name)?;
    u64::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            PrivassetError::invalid_input(format!("{name} field must be a positive integer"))
        })
}

// ---------------------------------------------------------------------------
// CreateAsset
// ---------------------------------------------------------------------------

/// Raw `asset_properties` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetPropertiesInput {
    #[serde(rename = "objectType")]
    pub object_type: Option<String>,
    #[serde(rename = "assetID")]
    pub asset_id: Option<String>,
    pub color: Option<String>,
    pub size: Option<i64>,
    #[serde(rename = "appraisedValue")]
    pub appraised_value: Option<i64>,
}

/// Validated request to create an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub object_type: String,
    pub asset_id: AssetId,
    pub color: String,
    pub size: u32,
    pub appraised_value: u64,
}

impl NewAsset {
    /// The private detail record this request will store.
    #[must_use]
    pub fn private_details(&self) -> AssetPrivateDetails {
        AssetPrivateDetails {
            asset_id: self.asset_id.clone(),
            color: self.color.clone(),
            size: self.size,
            appraised_value: self.appraised_value,
        }
    }
}

impl TryFrom<AssetPropertiesInput> for NewAsset {
    type Error = PrivassetError;

    fn try_from(input: AssetPropertiesInput) -> Result<Self> {
        let object_type = non_empty(input.object_type, "objectType")?;
        let asset_id = AssetId::parse(non_empty(input.asset_id, "assetID")?)?;
        let color = non_empty(input.color, "color")?;
        let size = u32::try_from(positive(input.size, "size")?)
            .map_err(|_| PrivassetError::invalid_input("size field is out of range"))?;
        let appraised_value = positive(input.appraised_value, "appraisedValue")?;
        Ok(Self {
            object_type,
            asset_id,
            color,
            size,
            appraised_value,
        })
    }
}

// ---------------------------------------------------------------------------
// AgreeToTransfer
// ---------------------------------------------------------------------------

/// Raw `asset_value` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetValueInput {
    #[serde(rename = "assetID")]
    pub asset_id: Option<String>,
    #[serde(rename = "appraisedValue")]
    pub appraised_value: Option<i64>,
}

/// Validated buyer declaration of the value it agrees to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDeclaration {
    pub asset_id: AssetId,
    pub declared_value: u64,
}

impl TryFrom<AssetValueInput> for ValueDeclaration {
    type Error = PrivassetError;

    fn try_from(input: AssetValueInput) -> Result<Self> {
        Ok(Self {
            asset_id: AssetId::parse(non_empty(input.asset_id, "assetID")?)?,
            declared_value: positive(input.appraised_value, "appraisedValue")?,
        })
    }
}

// ---------------------------------------------------------------------------
// TransferAsset
// ---------------------------------------------------------------------------

/// Raw `asset_owner` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetOwnerInput {
    #[serde(rename = "assetID")]
    pub asset_id: Option<String>,
    #[serde(rename = "buyerOrg")]
    pub buyer_org: Option<String>,
}

/// Validated request to hand an asset to `buyer_org`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerChange {
    pub asset_id: AssetId,
    pub buyer_org: OrgId,
}

impl TryFrom<AssetOwnerInput> for OwnerChange {
    type Error = PrivassetError;

    fn try_from(input: AssetOwnerInput) -> Result<Self> {
        Ok(Self {
            asset_id: AssetId::parse(non_empty(input.asset_id, "assetID")?)?,
            buyer_org: OrgId::new(non_empty(input.buyer_org, "buyerOrg")?),
        })
    }
}

// ---------------------------------------------------------------------------
// DeleteAsset / DeleteTransferAgreement
// ---------------------------------------------------------------------------

/// Raw `asset_delete` / `agreement_delete` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetRefInput {
    #[serde(rename = "assetID")]
    pub asset_id: Option<String>,
}

impl TryFrom<AssetRefInput> for AssetId {
    type Error = PrivassetError;

    fn try_from(input: AssetRefInput) -> Result<Self> {
        AssetId::parse(non_empty(input.asset_id, "assetID")?)
    }
}

/// Test helpers: transient payload bytes in their wire shape.
#[cfg(any(test, feature = "test-helpers"))]
pub mod payloads {
    use serde_json::json;

    pub fn asset_properties(
        asset_id: &str,
        color: &str,
        size: u32,
        appraised_value: u64,
    ) -> Vec<u8> {
        json!({
            "objectType": crate::constants::ASSET_OBJECT_TYPE,
            "assetID": asset_id,
            "color": color,
            "size": size,
            "appraisedValue": appraised_value,
        })
        .to_string()
        .into_bytes()
    }

    pub fn asset_value(asset_id: &str, appraised_value: u64) -> Vec<u8> {
        json!({ "assetID": asset_id, "appraisedValue": appraised_value })
            .to_string()
            .into_bytes()
    }

    pub fn asset_owner(asset_id: &str, buyer_org: &str) -> Vec<u8> {
        json!({ "assetID": asset_id, "buyerOrg": buyer_org })
            .to_string()
            .into_bytes()
    }

    pub fn asset_ref(asset_id: &str) -> Vec<u8> {
        json!({ "assetID": asset_id }).to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(json: &str) -> Result<NewAsset> {
        let input: AssetPropertiesInput = decode_transient("asset_properties", json.as_bytes())?;
        NewAsset::try_from(input)
    }

    #[test]
    fn valid_asset_properties() {
        let asset = props(
            r#"{"objectType":"asset","assetID":"asset1","color":"green","size":20,"appraisedValue":100}"#,
        )
        .unwrap();
        assert_eq!(asset.asset_id.as_str(), "asset1");
        assert_eq!(asset.size, 20);
        assert_eq!(asset.appraised_value, 100);
        assert_eq!(asset.private_details().color, "green");
    }

    #[test]
    fn missing_field_rejected() {
        let err =
            props(r#"{"objectType":"asset","assetID":"asset1","size":20,"appraisedValue":100}"#)
                .unwrap_err();
        match err {
            PrivassetError::InvalidInput { reason } => {
                assert!(reason.contains("color"), "{reason}");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_value_rejected() {
        for value in ["0", "-5"] {
            let json = format!(
                r#"{{"objectType":"asset","assetID":"asset1","color":"blue","size":1,"appraisedValue":{value}}}"#
            );
            let err = props(&json).unwrap_err();
            assert!(matches!(err, PrivassetError::InvalidInput { .. }), "value {value}");
        }
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        let err = decode_transient::<AssetValueInput>("asset_value", b"{not json").unwrap_err();
        assert!(matches!(err, PrivassetError::InvalidInput { .. }));
    }

    #[test]
    fn value_declaration_requires_value() {
        let input: AssetValueInput =
            decode_transient("asset_value", br#"{"assetID":"a1"}"#).unwrap();
        let err = ValueDeclaration::try_from(input).unwrap_err();
        assert!(matches!(err, PrivassetError::InvalidInput { .. }));
    }

    #[test]
    fn owner_change_parses() {
        let input: AssetOwnerInput =
            decode_transient("asset_owner", br#"{"assetID":"a1","buyerOrg":"Org2MSP"}"#).unwrap();
        let change = OwnerChange::try_from(input).unwrap();
        assert_eq!(change.buyer_org, OrgId::new("Org2MSP"));
    }

    #[test]
    fn asset_ref_rejects_empty_id() {
        let input: AssetRefInput = decode_transient("asset_delete", br#"{"assetID":""}"#).unwrap();
        assert!(AssetId::try_from(input).is_err());
    }
}
