//! Transfer agreement manager: records a buyer's committed value.
//!
//! Agreeing writes two records atomically:
//! 1. the public commitment under `("transferAgreement", assetID, buyerOrg)`
//! 2. the raw declared value, only in the buyer's own collection
//!
//! The seller never sees the raw value. At transfer time it recomputes the
//! commitment from its own appraisal and compares (see [`AgreementManager::verify`]).

use privasset_ledger::TxContext;
use privasset_types::{
    AssetId, AssetState, BuyerBid, NetworkConfig, PrivassetError, Result, TransferAgreement,
    ValueCommitment, ValueDeclaration,
};

use crate::guard::{AuthorizationGuard, Operation};
use crate::state_machine::state_given;
use crate::{private_store, public_ledger};

/// Publishes, reads and withdraws buyer commitments.
pub struct AgreementManager<'n> {
    network: &'n NetworkConfig,
}

impl<'n> AgreementManager<'n> {
    #[must_use]
    pub fn new(network: &'n NetworkConfig) -> Self {
        Self { network }
    }

    /// Publish the caller's commitment to buy `declaration.asset_id`.
    ///
    /// The same buyer may re-declare, replacing its earlier value.
    ///
    /// # Errors
    /// - `NotFound` if the asset does not exist
    /// - `Unauthorized` if the caller already owns it
    /// - `AgreementOutstanding` if another buyer holds an agreement
    pub fn agree(
        &self,
        ctx: &mut TxContext<'_>,
        declaration: &ValueDeclaration,
    ) -> Result<TransferAgreement> {
        let asset_id = &declaration.asset_id;
        let asset = public_ledger::get_asset(ctx, asset_id)?
            .ok_or_else(|| PrivassetError::not_found(format!("asset {asset_id}")))?;
        let buyer = ctx.client_org().clone();
        AuthorizationGuard::check_asset(Operation::AgreeToTransfer, &buyer, &asset)?;

        let existing = public_ledger::find_agreement(ctx, asset_id)?;
        if let Some(existing) = &existing {
            if existing.buyer_org != buyer {
                return Err(PrivassetError::AgreementOutstanding {
                    asset_id: asset_id.clone(),
                    buyer_org: existing.buyer_org.clone(),
                });
            }
        }
        let state = state_given(existing.as_ref());
        if !state.can_transition_to(AssetState::AgreementPending) {
            return Err(PrivassetError::Internal(format!(
                "asset {asset_id} cannot take an agreement in state {state}"
            )));
        }

        let agreement = TransferAgreement {
            asset_id: asset_id.clone(),
            buyer_org: buyer.clone(),
            value_commitment: ValueCommitment::compute(asset_id, declaration.declared_value),
        };
        let bid = BuyerBid {
            asset_id: asset_id.clone(),
            appraised_value: declaration.declared_value,
        };
        let collection = private_store::collection_of(self.network, &buyer)?;
        public_ledger::put_agreement(ctx, &agreement)?;
        private_store::put_bid(ctx, &collection, &bid)?;

        tracing::debug!(
            asset_id = %asset_id,
            buyer = %buyer,
            commitment = %agreement.value_commitment,
            redeclared = existing.is_some(),
            "Transfer agreement staged"
        );
        Ok(agreement)
    }

    /// The outstanding agreement on an asset. Readable by anyone; it carries
    /// only the commitment.
    ///
    /// # Errors
    /// - `NotFound` if no agreement is published
    pub fn read(&self, ctx: &mut TxContext<'_>, asset_id: &AssetId) -> Result<TransferAgreement> {
        public_ledger::find_agreement(ctx, asset_id)?.ok_or_else(|| {
            PrivassetError::not_found(format!("transfer agreement for asset {asset_id}"))
        })
    }

    /// Withdraw the outstanding agreement, removing the commitment and the
    /// buyer's bid. Either the buyer or the asset's current owner may do this.
    ///
    /// # Errors
    /// - `NoAgreement` if no agreement is published
    /// - `Unauthorized` if the caller is neither its buyer nor the owner
    pub fn withdraw(&self, ctx: &mut TxContext<'_>, asset_id: &AssetId) -> Result<()> {
        let caller = ctx.client_org().clone();
        let agreement = public_ledger::find_agreement(ctx, asset_id)?.ok_or_else(|| {
            PrivassetError::NoAgreement {
                asset_id: asset_id.clone(),
                buyer_org: caller.clone(),
            }
        })?;
        let owner = public_ledger::get_asset(ctx, asset_id)?.map(|asset| asset.owner_org);
        AuthorizationGuard::check_withdraw(&caller, &agreement, owner.as_ref())?;

        let collection = private_store::collection_of(self.network, &agreement.buyer_org)?;
        public_ledger::delete_agreement(ctx, asset_id, &agreement.buyer_org)?;
        private_store::delete_bid(ctx, &collection, asset_id)?;

        tracing::debug!(
            asset_id = %asset_id,
            caller = %caller,
            buyer = %agreement.buyer_org,
            "Agreement withdrawal staged"
        );
        Ok(())
    }

    /// Check that the seller's private appraisal opens the buyer's commitment.
    ///
    /// # Errors
    /// - `AgreementMismatch` if the values differ
    pub fn verify(agreement: &TransferAgreement, appraised_value: u64) -> Result<()> {
        if agreement
            .value_commitment
            .matches(&agreement.asset_id, appraised_value)
        {
            return Ok(());
        }
        tracing::warn!(
            asset_id = %agreement.asset_id,
            buyer = %agreement.buyer_org,
            "Committed value does not match appraisal"
        );
        Err(PrivassetError::AgreementMismatch(agreement.asset_id.clone()))
    }
}
