//! Configuration types for the channel and the client gateway.

use serde::{Deserialize, Serialize};

use crate::{CollectionName, OrgId, PrivassetError, Result, constants};

/// One organization on the channel and the private collection it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgConfig {
    /// MSP identifier, e.g. `Org1MSP`.
    pub msp_id: OrgId,
    /// Collection only this organization's peers may read.
    pub private_collection: CollectionName,
}

impl OrgConfig {
    /// Organization using the conventional `<MSP>PrivateCollection` name.
    #[must_use]
    pub fn with_default_collection(msp_id: impl Into<String>) -> Self {
        let msp_id = OrgId::new(msp_id);
        let private_collection = msp_id.default_private_collection();
        Self {
            msp_id,
            private_collection,
        }
    }
}

/// Channel layout shared by the ledger substrate and the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Channel name.
    pub channel: String,
    /// Name the asset-transfer chaincode is installed under.
    pub chaincode: String,
    /// Participating organizations.
    pub organizations: Vec<OrgConfig>,
}

impl NetworkConfig {
    /// Two-organization channel used by the samples and tests.
    #[must_use]
    pub fn two_orgs() -> Self {
        Self {
            channel: constants::DEFAULT_CHANNEL.to_string(),
            chaincode: constants::DEFAULT_CHAINCODE.to_string(),
            organizations: vec![
                OrgConfig::with_default_collection("Org1MSP"),
                OrgConfig::with_default_collection("Org2MSP"),
            ],
        }
    }

    /// Parse and validate a JSON channel description.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PrivassetError::Configuration(format!("network config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that names are present and unique.
    pub fn validate(&self) -> Result<()> {
        if self.channel.is_empty() || self.chaincode.is_empty() {
            return Err(PrivassetError::Configuration(
                "channel and chaincode names must be non-empty".to_string(),
            ));
        }
        if self.organizations.is_empty() {
            return Err(PrivassetError::Configuration(
                "at least one organization is required".to_string(),
            ));
        }
        let mut orgs = std::collections::BTreeSet::new();
        let mut collections = std::collections::BTreeSet::new();
        for org in &self.organizations {
            if org.msp_id.as_str().is_empty() || org.private_collection.as_str().is_empty() {
                return Err(PrivassetError::Configuration(
                    "organization and collection names must be non-empty".to_string(),
                ));
            }
            if !orgs.insert(&org.msp_id) {
                return Err(PrivassetError::Configuration(format!(
                    "duplicate organization {}",
                    org.msp_id
                )));
            }
            if !collections.insert(&org.private_collection) {
                return Err(PrivassetError::Configuration(format!(
                    "collection {} is assigned to more than one organization",
                    org.private_collection
                )));
            }
        }
        Ok(())
    }

    /// Look up an organization's configuration.
    #[must_use]
    pub fn org(&self, msp_id: &OrgId) -> Option<&OrgConfig> {
        self.organizations.iter().find(|o| &o.msp_id == msp_id)
    }

    /// The private collection owned by `msp_id`.
    pub fn private_collection_of(&self, msp_id: &OrgId) -> Result<&CollectionName> {
        self.org(msp_id)
            .map(|o| &o.private_collection)
            .ok_or_else(|| PrivassetError::UnknownOrganization(msp_id.clone()))
    }
}

/// Client gateway behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Endorse+commit attempts before an MVCC conflict is surfaced.
    pub max_commit_attempts: u32,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: constants::DEFAULT_MAX_COMMIT_ATTEMPTS,
            log_json: false,
        }
    }
}
