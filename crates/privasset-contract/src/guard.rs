//! Authorization guard: hard gate in front of every state change.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: any unmet requirement rejects the call before a write
//!   is staged
//! - **Organization-scoped**: decisions depend only on the submitting
//!   client's organization, the executing peer's organization and the
//!   asset's owner
//! - **No bypass**: the dispatcher runs the peer check for every operation
//!   before handing over to the state machine

use std::fmt;
use std::str::FromStr;

use privasset_types::{Asset, OrgId, PrivassetError, Result, TransferAgreement};

/// Every function the contract exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAsset,
    ReadAsset,
    GetAssetByRange,
    AgreeToTransfer,
    ReadTransferAgreement,
    TransferAsset,
    ReadAssetPrivateDetails,
    DeleteAsset,
    DeleteTransferAgreement,
    QueryAssetsByOwner,
}

impl Operation {
    pub const ALL: [Self; 10] = [
        Self::CreateAsset,
        Self::ReadAsset,
        Self::GetAssetByRange,
        Self::AgreeToTransfer,
        Self::ReadTransferAgreement,
        Self::TransferAsset,
        Self::ReadAssetPrivateDetails,
        Self::DeleteAsset,
        Self::DeleteTransferAgreement,
        Self::QueryAssetsByOwner,
    ];

    /// Function name on the wire.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateAsset => "CreateAsset",
            Self::ReadAsset => "ReadAsset",
            Self::GetAssetByRange => "GetAssetByRange",
            Self::AgreeToTransfer => "AgreeToTransfer",
            Self::ReadTransferAgreement => "ReadTransferAgreement",
            Self::TransferAsset => "TransferAsset",
            Self::ReadAssetPrivateDetails => "ReadAssetPrivateDetails",
            Self::DeleteAsset => "DeleteAsset",
            Self::DeleteTransferAgreement => "DeleteTransferAgreement",
            Self::QueryAssetsByOwner => "QueryAssetsByOwner",
        }
    }

    /// Does this operation stage writes into the caller's own collection?
    #[must_use]
    pub fn writes_own_collection(self) -> bool {
        matches!(
            self,
            Self::CreateAsset
                | Self::AgreeToTransfer
                | Self::TransferAsset
                | Self::DeleteAsset
                | Self::DeleteTransferAgreement
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = PrivassetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| PrivassetError::UnknownFunction(s.to_string()))
    }
}

/// Stateless authorization checks.
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// A client may only make its own organization's peer write to the
    /// caller's private collection.
    pub fn check_peer(op: Operation, client_org: &OrgId, peer_org: &OrgId) -> Result<()> {
        if op.writes_own_collection() && client_org != peer_org {
            tracing::warn!(
                operation = %op,
                client_org = %client_org,
                peer_org = %peer_org,
                "Client submitted to a peer of another organization"
            );
            return Err(PrivassetError::unauthorized(format!(
                "{op}: client from {client_org} may not write through a {peer_org} peer"
            )));
        }
        Ok(())
    }

    /// Owner-relationship check for operations that act on an existing asset.
    pub fn check_asset(op: Operation, caller: &OrgId, asset: &Asset) -> Result<()> {
        let is_owner = *caller == asset.owner_org;
        let allowed = match op {
            Operation::AgreeToTransfer => !is_owner,
            Operation::TransferAsset | Operation::DeleteAsset => is_owner,
            _ => true,
        };
        if allowed {
            return Ok(());
        }
        tracing::warn!(
            operation = %op,
            caller = %caller,
            owner = %asset.owner_org,
            asset_id = %asset.asset_id,
            "Authorization rejected"
        );
        let reason = if is_owner {
            format!("{op}: {caller} already owns asset {}", asset.asset_id)
        } else {
            format!(
                "{op}: {caller} does not own asset {} (owner is {})",
                asset.asset_id, asset.owner_org
            )
        };
        Err(PrivassetError::unauthorized(reason))
    }

    /// The buyer that published an agreement may withdraw it, and so may the
    /// asset's current owner. `owner` is `None` once the asset is gone.
    pub fn check_withdraw(
        caller: &OrgId,
        agreement: &TransferAgreement,
        owner: Option<&OrgId>,
    ) -> Result<()> {
        if *caller == agreement.buyer_org || owner == Some(caller) {
            return Ok(());
        }
        tracing::warn!(
            caller = %caller,
            buyer = %agreement.buyer_org,
            asset_id = %agreement.asset_id,
            "Agreement withdrawal rejected"
        );
        Err(PrivassetError::unauthorized(format!(
            "{}: {caller} is neither the buyer nor the owner of asset {}",
            Operation::DeleteTransferAgreement,
            agreement.asset_id
        )))
    }
}
