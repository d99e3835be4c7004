//! Typed access to organization-scoped private collections.
//!
//! Private details sit under the simple `assetID` key in the owner's
//! collection. A buyer's bid sits under the composite key
//! `("transferAgreement", assetID)` in the buyer's own collection.
//!
//! Reads on a peer outside the collection come back `None`; the substrate
//! enforces that, not this module.

use privasset_ledger::{TxContext, create_composite_key};
use privasset_types::{
    AssetId, AssetPrivateDetails, BuyerBid, CollectionName, NetworkConfig, OrgId, Result,
    constants::TRANSFER_AGREEMENT_OBJECT_TYPE,
};

use crate::public_ledger::decode;

/// Collection owned by `org` in this network.
pub fn collection_of(network: &NetworkConfig, org: &OrgId) -> Result<CollectionName> {
    network.private_collection_of(org).cloned()
}

pub fn get_details(
    ctx: &mut TxContext<'_>,
    collection: &CollectionName,
    asset_id: &AssetId,
) -> Result<Option<AssetPrivateDetails>> {
    ctx.get_private_data(collection, asset_id.as_str())?
        .map(|bytes| decode(&bytes))
        .transpose()
}

pub fn put_details(
    ctx: &mut TxContext<'_>,
    collection: &CollectionName,
    details: &AssetPrivateDetails,
) -> Result<()> {
    ctx.put_private_data(
        collection,
        details.asset_id.as_str(),
        serde_json::to_vec(details)?,
    )
}

pub fn delete_details(
    ctx: &mut TxContext<'_>,
    collection: &CollectionName,
    asset_id: &AssetId,
) -> Result<()> {
    ctx.del_private_data(collection, asset_id.as_str())
}

fn bid_key(asset_id: &AssetId) -> Result<String> {
    create_composite_key(TRANSFER_AGREEMENT_OBJECT_TYPE, &[asset_id.as_str()])
}

pub fn get_bid(
    ctx: &mut TxContext<'_>,
    collection: &CollectionName,
    asset_id: &AssetId,
) -> Result<Option<BuyerBid>> {
    let key = bid_key(asset_id)?;
    ctx.get_private_data(collection, &key)?
        .map(|bytes| decode(&bytes))
        .transpose()
}

pub fn put_bid(ctx: &mut TxContext<'_>, collection: &CollectionName, bid: &BuyerBid) -> Result<()> {
    let key = bid_key(&bid.asset_id)?;
    ctx.put_private_data(collection, &key, serde_json::to_vec(bid)?)
}

pub fn delete_bid(
    ctx: &mut TxContext<'_>,
    collection: &CollectionName,
    asset_id: &AssetId,
) -> Result<()> {
    let key = bid_key(asset_id)?;
    ctx.del_private_data(collection, &key)
}
