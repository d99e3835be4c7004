//! Asset state machine: create, read, range, delete and derived state.
//!
//! State is never stored. It is read off the records present in the
//! snapshot (see [`AssetState`]), and every transition is checked against
//! [`AssetState::can_transition_to`] before writes are staged.

use privasset_ledger::TxContext;
use privasset_types::{
    Asset, AssetId, AssetPrivateDetails, AssetState, CollectionName, NetworkConfig, NewAsset,
    OrgId, PrivassetError, Result, TransferAgreement,
};

use crate::guard::{AuthorizationGuard, Operation};
use crate::{private_store, public_ledger};

/// Lifecycle operations on assets.
pub struct AssetStateMachine<'n> {
    network: &'n NetworkConfig,
}

impl<'n> AssetStateMachine<'n> {
    #[must_use]
    pub fn new(network: &'n NetworkConfig) -> Self {
        Self { network }
    }

    /// Create an asset owned by the caller's organization.
    ///
    /// Writes the public record and the private details to the caller's
    /// collection in the same transaction.
    ///
    /// # Errors
    /// - `AlreadyExists` if a public record with this ID is present
    pub fn create(&self, ctx: &mut TxContext<'_>, request: &NewAsset) -> Result<Asset> {
        if public_ledger::get_asset(ctx, &request.asset_id)?.is_some() {
            return Err(PrivassetError::AlreadyExists(request.asset_id.clone()));
        }
        let owner = ctx.client_org().clone();
        let collection = private_store::collection_of(self.network, &owner)?;

        let asset = Asset {
            object_type: request.object_type.clone(),
            asset_id: request.asset_id.clone(),
            owner_org: owner,
        };
        public_ledger::put_asset(ctx, &asset)?;
        private_store::put_details(ctx, &collection, &request.private_details())?;

        tracing::debug!(
            asset_id = %asset.asset_id,
            owner = %asset.owner_org,
            collection = %collection,
            "Asset creation staged"
        );
        Ok(asset)
    }

    /// Public record of an asset.
    ///
    /// # Errors
    /// - `NotFound` if the asset does not exist
    pub fn read(&self, ctx: &mut TxContext<'_>, asset_id: &AssetId) -> Result<Asset> {
        public_ledger::get_asset(ctx, asset_id)?
            .ok_or_else(|| PrivassetError::not_found(format!("asset {asset_id}")))
    }

    /// Private details held in `collection`. `None` when that collection has
    /// no record, or when this peer is not allowed to see it.
    pub fn read_private(
        &self,
        ctx: &mut TxContext<'_>,
        collection: &CollectionName,
        asset_id: &AssetId,
    ) -> Result<Option<AssetPrivateDetails>> {
        private_store::get_details(ctx, collection, asset_id)
    }

    /// Assets with keys in `[start, end)`, ascending. Empty `end` is unbounded.
    ///
    /// # Errors
    /// - `EmptyResult` if the range holds no assets
    pub fn range(&self, ctx: &mut TxContext<'_>, start: &str, end: &str) -> Result<Vec<Asset>> {
        let assets = public_ledger::assets_in_range(ctx, start, end)?.collect::<Result<Vec<_>>>()?;
        if assets.is_empty() {
            return Err(PrivassetError::EmptyResult {
                query: format!("assets in [{start:?}, {end:?})"),
            });
        }
        Ok(assets)
    }

    /// Every asset currently owned by `owner`. May be empty.
    pub fn query_by_owner(&self, ctx: &mut TxContext<'_>, owner: &OrgId) -> Result<Vec<Asset>> {
        let mut owned = Vec::new();
        for asset in public_ledger::assets_in_range(ctx, "", "")? {
            let asset = asset?;
            if asset.owner_org == *owner {
                owned.push(asset);
            }
        }
        Ok(owned)
    }

    /// Derived lifecycle state. An asset with no public record reads as
    /// `Deleted`, whether it was deleted or never created.
    pub fn state_of(&self, ctx: &mut TxContext<'_>, asset_id: &AssetId) -> Result<AssetState> {
        if public_ledger::get_asset(ctx, asset_id)?.is_none() {
            return Ok(AssetState::Deleted);
        }
        Ok(state_given(public_ledger::find_agreement(ctx, asset_id)?.as_ref()))
    }

    /// Delete an asset and the owner's private details.
    ///
    /// # Errors
    /// - `NotFound` if the asset does not exist
    /// - `Unauthorized` if the caller does not own it
    /// - `AgreementOutstanding` while a buyer's agreement is published
    pub fn delete(&self, ctx: &mut TxContext<'_>, asset_id: &AssetId) -> Result<()> {
        let asset = self.read(ctx, asset_id)?;
        let caller = ctx.client_org().clone();
        AuthorizationGuard::check_asset(Operation::DeleteAsset, &caller, &asset)?;

        let agreement = public_ledger::find_agreement(ctx, asset_id)?;
        let state = state_given(agreement.as_ref());
        if !state.can_transition_to(AssetState::Deleted) {
            let buyer_org = agreement
                .map(|a| a.buyer_org)
                .ok_or_else(|| {
                    PrivassetError::Internal(format!("asset {asset_id} in state {state}"))
                })?;
            return Err(PrivassetError::AgreementOutstanding {
                asset_id: asset_id.clone(),
                buyer_org,
            });
        }

        let collection = private_store::collection_of(self.network, &asset.owner_org)?;
        public_ledger::delete_asset(ctx, asset_id)?;
        private_store::delete_details(ctx, &collection, asset_id)?;

        tracing::debug!(asset_id = %asset_id, owner = %asset.owner_org, "Asset deletion staged");
        Ok(())
    }
}

/// State of an asset known to exist.
pub(crate) fn state_given(agreement: Option<&TransferAgreement>) -> AssetState {
    if agreement.is_some() {
        AssetState::AgreementPending
    } else {
        AssetState::Created
    }
}
