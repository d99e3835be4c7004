//! Typed access to the shared public state.
//!
//! Assets live under their simple `assetID` key. Transfer agreements live
//! under the composite key `("transferAgreement", assetID, buyerOrg)` so a
//! partial-key scan on `assetID` finds the outstanding one, and so they never
//! show up in simple-key range scans.

use privasset_ledger::{TxContext, create_composite_key};
use privasset_types::{
    Asset, AssetId, OrgId, Result, TransferAgreement, constants::TRANSFER_AGREEMENT_OBJECT_TYPE,
};
use serde::de::DeserializeOwned;

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn get_asset(ctx: &mut TxContext<'_>, asset_id: &AssetId) -> Result<Option<Asset>> {
    ctx.get_state(asset_id.as_str())?
        .map(|bytes| decode(&bytes))
        .transpose()
}

pub fn put_asset(ctx: &mut TxContext<'_>, asset: &Asset) -> Result<()> {
    ctx.put_state(asset.asset_id.as_str(), serde_json::to_vec(asset)?)
}

pub fn delete_asset(ctx: &mut TxContext<'_>, asset_id: &AssetId) -> Result<()> {
    ctx.del_state(asset_id.as_str())
}

/// Assets with keys in `[start, end)`, ascending. Lazy: each record is read
/// (and recorded for commit validation) only when the iterator reaches it.
pub fn assets_in_range<'c>(
    ctx: &'c mut TxContext<'_>,
    start: &str,
    end: &str,
) -> Result<impl Iterator<Item = Result<Asset>> + use<'c>> {
    Ok(ctx
        .get_state_by_range(start, end)?
        .map(|(_, bytes)| decode::<Asset>(&bytes)))
}

fn agreement_key(asset_id: &AssetId, buyer_org: &OrgId) -> Result<String> {
    create_composite_key(
        TRANSFER_AGREEMENT_OBJECT_TYPE,
        &[asset_id.as_str(), buyer_org.as_str()],
    )
}

pub fn get_agreement(
    ctx: &mut TxContext<'_>,
    asset_id: &AssetId,
    buyer_org: &OrgId,
) -> Result<Option<TransferAgreement>> {
    let key = agreement_key(asset_id, buyer_org)?;
    ctx.get_state(&key)?
        .map(|bytes| decode(&bytes))
        .transpose()
}

/// The outstanding agreement on `asset_id`, whoever the buyer is.
pub fn find_agreement(
    ctx: &mut TxContext<'_>,
    asset_id: &AssetId,
) -> Result<Option<TransferAgreement>> {
    ctx.get_state_by_partial_composite_key(TRANSFER_AGREEMENT_OBJECT_TYPE, &[asset_id.as_str()])?
        .next()
        .map(|(_, bytes)| decode(&bytes))
        .transpose()
}

pub fn put_agreement(ctx: &mut TxContext<'_>, agreement: &TransferAgreement) -> Result<()> {
    let key = agreement_key(&agreement.asset_id, &agreement.buyer_org)?;
    ctx.put_state(&key, serde_json::to_vec(agreement)?)
}

pub fn delete_agreement(
    ctx: &mut TxContext<'_>,
    asset_id: &AssetId,
    buyer_org: &OrgId,
) -> Result<()> {
    let key = agreement_key(asset_id, buyer_org)?;
    ctx.del_state(&key)
}
