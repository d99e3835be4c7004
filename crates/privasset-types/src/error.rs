//! Error types for privasset.
//!
//! All errors use the `PA_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Asset errors
//! - 2xx: Transfer agreement errors
//! - 3xx: Authorization errors
//! - 4xx: Input errors
//! - 5xx: Ledger substrate errors
//! - 6xx: Identity errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{AssetId, CollectionName, OrgId};

/// Central error enum for all privasset operations.
#[derive(Debug, Error)]
pub enum PrivassetError {
    // =================================================================
    // Asset Errors (1xx)
    // =================================================================
    /// A public record with this asset ID already exists.
    #[error("PA_ERR_100: Asset already exists: {0}")]
    AlreadyExists(AssetId),

    /// No public record exists for this key.
    #[error("PA_ERR_101: Not found: {what}")]
    NotFound { what: String },

    /// A range or point query produced nothing. Non-fatal to caller flow.
    #[error("PA_ERR_102: Empty result: {query}")]
    EmptyResult { query: String },

    // =================================================================
    // Transfer Agreement Errors (2xx)
    // =================================================================
    /// Transfer attempted without a matching buyer commitment.
    #[error("PA_ERR_200: No transfer agreement for asset {asset_id} and buyer {buyer_org}")]
    NoAgreement { asset_id: AssetId, buyer_org: OrgId },

    /// The buyer's committed value and the seller's appraisal disagree.
    #[error("PA_ERR_201: Agreement mismatch for asset {0}: committed value does not match appraisal")]
    AgreementMismatch(AssetId),

    /// Another organization already holds an outstanding agreement.
    #[error("PA_ERR_202: Asset {asset_id} has an outstanding agreement with {buyer_org}")]
    AgreementOutstanding { asset_id: AssetId, buyer_org: OrgId },

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The caller's organization lacks the required relationship to the asset.
    #[error("PA_ERR_300: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // Input Errors (4xx)
    // =================================================================
    /// Malformed or missing payload fields.
    #[error("PA_ERR_400: Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The named contract function does not exist.
    #[error("PA_ERR_401: Unknown function: {0}")]
    UnknownFunction(String),

    /// A required transient key was not supplied.
    #[error("PA_ERR_402: Missing transient field: {0}")]
    MissingTransient(String),

    // =================================================================
    // Ledger Substrate Errors (5xx)
    // =================================================================
    /// The collection is not defined on this channel.
    #[error("PA_ERR_500: Unknown collection: {0}")]
    UnknownCollection(CollectionName),

    /// A key read during simulation changed before commit. Retryable.
    #[error("PA_ERR_501: MVCC read conflict on {key}")]
    MvccReadConflict { key: String },

    // =================================================================
    // Identity Errors (6xx)
    // =================================================================
    /// The creator organization is not registered on the channel.
    #[error("PA_ERR_600: Unknown organization: {0}")]
    UnknownOrganization(OrgId),

    /// The proposal signature did not verify against the creator's key.
    #[error("PA_ERR_601: Invalid proposal signature from {0}")]
    InvalidSignature(OrgId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("PA_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization of a stored record failed.
    #[error("PA_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("PA_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl PrivassetError {
    /// Expected, recoverable business outcomes callers may branch on.
    #[must_use]
    pub fn is_business_outcome(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::AgreementMismatch(_) | Self::NoAgreement { .. }
        )
    }

    /// Whether resubmitting the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MvccReadConflict { .. })
    }

    /// Shorthand for [`PrivassetError::NotFound`].
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound {
            what: what.to_string(),
        }
    }

    /// Shorthand for [`PrivassetError::Unauthorized`].
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`PrivassetError::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PrivassetError>;

impl From<serde_json::Error> for PrivassetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str) -> AssetId {
        AssetId::parse(id).unwrap()
    }

    #[test]
    fn error_display_contains_prefix() {
        let err = PrivassetError::AlreadyExists(asset("asset1"));
        let msg = format!("{err}");
        assert!(msg.starts_with("PA_ERR_100"), "Got: {msg}");
        assert!(msg.contains("asset1"));
    }

    #[test]
    fn no_agreement_display() {
        let err = PrivassetError::NoAgreement {
            asset_id: asset("asset1"),
            buyer_org: OrgId::new("Org2MSP"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("PA_ERR_200"));
        assert!(msg.contains("Org2MSP"));
    }

    #[test]
    fn business_outcomes_classified() {
        assert!(PrivassetError::unauthorized("x").is_business_outcome());
        assert!(PrivassetError::AgreementMismatch(asset("a")).is_business_outcome());
        assert!(
            PrivassetError::NoAgreement {
                asset_id: asset("a"),
                buyer_org: OrgId::new("Org2MSP"),
            }
            .is_business_outcome()
        );
        assert!(!PrivassetError::AlreadyExists(asset("a")).is_business_outcome());
        assert!(!PrivassetError::invalid_input("x").is_business_outcome());
    }

    #[test]
    fn only_mvcc_conflicts_are_retryable() {
        assert!(PrivassetError::MvccReadConflict { key: "k".into() }.is_retryable());
        assert!(!PrivassetError::Internal("x".into()).is_retryable());
        assert!(!PrivassetError::unauthorized("x").is_retryable());
    }

    #[test]
    fn all_errors_have_pa_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(PrivassetError::not_found("asset1")),
            Box::new(PrivassetError::EmptyResult { query: "range".into() }),
            Box::new(PrivassetError::UnknownFunction("Foo".into())),
            Box::new(PrivassetError::UnknownCollection(CollectionName::new("c"))),
            Box::new(PrivassetError::InvalidSignature(OrgId::new("Org1MSP"))),
            Box::new(PrivassetError::Configuration("bad".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(msg.starts_with("PA_ERR_"), "Error missing PA_ERR_ prefix: {msg}");
        }
    }
}
