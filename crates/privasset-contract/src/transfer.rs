//! Transfer execution.
//!
//! When the owner hands an asset to an agreed buyer:
//! 1. Check the caller owns the asset
//! 2. Look up the buyer's published commitment
//! 3. Recompute it from the seller's private appraisal; refuse on mismatch
//! 4. Set the new owner on the public record
//! 5. Move the private details from the seller's collection to the buyer's
//! 6. Remove the public commitment and the buyer's bid
//!
//! Steps 4 to 6 are staged into one read/write set. Every check precedes the
//! first write, so a refused transfer stages nothing.

use privasset_ledger::TxContext;
use privasset_types::{Asset, AssetState, NetworkConfig, OwnerChange, PrivassetError, Result};

use crate::agreement::AgreementManager;
use crate::guard::{AuthorizationGuard, Operation};
use crate::state_machine::state_given;
use crate::{private_store, public_ledger};

/// Executes ownership transfers.
pub struct TransferExecutor<'n> {
    network: &'n NetworkConfig,
}

impl<'n> TransferExecutor<'n> {
    #[must_use]
    pub fn new(network: &'n NetworkConfig) -> Self {
        Self { network }
    }

    /// Transfer `change.asset_id` to `change.buyer_org`. Returns the updated
    /// public record.
    ///
    /// # Errors
    /// - `NotFound` if the asset or the seller's private details are missing
    /// - `Unauthorized` if the caller does not own the asset
    /// - `InvalidInput` if the buyer is unknown or is the owner
    /// - `NoAgreement` if the buyer has not published a commitment
    /// - `AgreementMismatch` if the commitment does not match the appraisal
    pub fn execute(&self, ctx: &mut TxContext<'_>, change: &OwnerChange) -> Result<Asset> {
        let asset_id = &change.asset_id;
        let buyer = &change.buyer_org;
        let mut asset = public_ledger::get_asset(ctx, asset_id)?
            .ok_or_else(|| PrivassetError::not_found(format!("asset {asset_id}")))?;
        let seller = ctx.client_org().clone();
        AuthorizationGuard::check_asset(Operation::TransferAsset, &seller, &asset)?;

        if self.network.org(buyer).is_none() {
            return Err(PrivassetError::invalid_input(format!(
                "buyerOrg {buyer} is not a member of this network"
            )));
        }
        if *buyer == seller {
            return Err(PrivassetError::invalid_input(format!(
                "asset {asset_id} is already owned by {buyer}"
            )));
        }

        let agreement = public_ledger::get_agreement(ctx, asset_id, buyer)?.ok_or_else(|| {
            PrivassetError::NoAgreement {
                asset_id: asset_id.clone(),
                buyer_org: buyer.clone(),
            }
        })?;
        debug_assert!(state_given(Some(&agreement)).can_transition_to(AssetState::Created));

        let seller_collection = private_store::collection_of(self.network, &seller)?;
        let details = private_store::get_details(ctx, &seller_collection, asset_id)?
            .ok_or_else(|| {
                PrivassetError::not_found(format!(
                    "private details of asset {asset_id} in {seller_collection}"
                ))
            })?;
        AgreementManager::verify(&agreement, details.appraised_value)?;

        let buyer_collection = private_store::collection_of(self.network, buyer)?;
        asset.owner_org = buyer.clone();
        public_ledger::put_asset(ctx, &asset)?;
        private_store::put_details(ctx, &buyer_collection, &details)?;
        private_store::delete_details(ctx, &seller_collection, asset_id)?;
        public_ledger::delete_agreement(ctx, asset_id, buyer)?;
        private_store::delete_bid(ctx, &buyer_collection, asset_id)?;

        tracing::debug!(
            asset_id = %asset_id,
            seller = %seller,
            buyer = %buyer,
            "Transfer staged"
        );
        Ok(asset)
    }
}
