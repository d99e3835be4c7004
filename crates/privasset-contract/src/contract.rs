//! Function-name dispatcher plugged into the ledger as its chaincode.
//!
//! Reads take positional arguments and return JSON. Writes take their input
//! from a transient payload (never recorded on the ledger) and return empty
//! bytes. `ReadAssetPrivateDetails` also returns empty bytes when nothing is
//! visible; callers must not confuse that with the JSON `[]` that
//! `QueryAssetsByOwner` returns for an owner with no assets.

use privasset_ledger::{Chaincode, TxContext};
use privasset_types::{
    AssetId, AssetOwnerInput, AssetPropertiesInput, AssetRefInput, AssetValueInput,
    CollectionName, NetworkConfig, NewAsset, OrgId, OwnerChange, PrivassetError, Result,
    ValueDeclaration, constants, decode_transient,
};
use serde::de::DeserializeOwned;

use crate::agreement::AgreementManager;
use crate::guard::{AuthorizationGuard, Operation};
use crate::state_machine::AssetStateMachine;
use crate::transfer::TransferExecutor;

/// The asset-transfer contract.
#[derive(Debug, Clone)]
pub struct AssetTransferContract {
    network: NetworkConfig,
}

impl AssetTransferContract {
    #[must_use]
    pub fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    #[must_use]
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    fn dispatch(&self, ctx: &mut TxContext<'_>, op: Operation, args: &[String]) -> Result<Vec<u8>> {
        let assets = AssetStateMachine::new(&self.network);
        let agreements = AgreementManager::new(&self.network);

        match op {
            Operation::CreateAsset => {
                expect_args::<0>(op, args)?;
                let input: AssetPropertiesInput =
                    transient_payload(ctx, constants::TRANSIENT_ASSET_PROPERTIES)?;
                assets.create(ctx, &NewAsset::try_from(input)?)?;
                Ok(Vec::new())
            }
            Operation::ReadAsset => {
                let [asset_id] = expect_args(op, args)?;
                let asset = assets.read(ctx, &AssetId::parse(asset_id)?)?;
                Ok(serde_json::to_vec(&asset)?)
            }
            Operation::GetAssetByRange => {
                let [start, end] = expect_args(op, args)?;
                Ok(serde_json::to_vec(&assets.range(ctx, start, end)?)?)
            }
            Operation::AgreeToTransfer => {
                expect_args::<0>(op, args)?;
                let input: AssetValueInput =
                    transient_payload(ctx, constants::TRANSIENT_ASSET_VALUE)?;
                agreements.agree(ctx, &ValueDeclaration::try_from(input)?)?;
                Ok(Vec::new())
            }
            Operation::ReadTransferAgreement => {
                let [asset_id] = expect_args(op, args)?;
                let agreement = agreements.read(ctx, &AssetId::parse(asset_id)?)?;
                Ok(serde_json::to_vec(&agreement)?)
            }
            Operation::TransferAsset => {
                expect_args::<0>(op, args)?;
                let input: AssetOwnerInput =
                    transient_payload(ctx, constants::TRANSIENT_ASSET_OWNER)?;
                TransferExecutor::new(&self.network).execute(ctx, &OwnerChange::try_from(input)?)?;
                Ok(Vec::new())
            }
            Operation::ReadAssetPrivateDetails => {
                let [collection, asset_id] = expect_args(op, args)?;
                let details = assets.read_private(
                    ctx,
                    &CollectionName::new(collection),
                    &AssetId::parse(asset_id)?,
                )?;
                match details {
                    Some(details) => Ok(serde_json::to_vec(&details)?),
                    None => Ok(Vec::new()),
                }
            }
            Operation::DeleteAsset => {
                expect_args::<0>(op, args)?;
                let input: AssetRefInput =
                    transient_payload(ctx, constants::TRANSIENT_ASSET_DELETE)?;
                assets.delete(ctx, &AssetId::try_from(input)?)?;
                Ok(Vec::new())
            }
            Operation::DeleteTransferAgreement => {
                expect_args::<0>(op, args)?;
                let input: AssetRefInput =
                    transient_payload(ctx, constants::TRANSIENT_AGREEMENT_DELETE)?;
                agreements.withdraw(ctx, &AssetId::try_from(input)?)?;
                Ok(Vec::new())
            }
            Operation::QueryAssetsByOwner => {
                let [owner] = expect_args(op, args)?;
                if owner.is_empty() {
                    return Err(PrivassetError::invalid_input("ownerOrg must be non-empty"));
                }
                let owned = assets.query_by_owner(ctx, &OrgId::new(owner))?;
                Ok(serde_json::to_vec(&owned)?)
            }
        }
    }
}

impl Chaincode for AssetTransferContract {
    fn invoke(&self, ctx: &mut TxContext<'_>, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let op: Operation = function.parse()?;
        AuthorizationGuard::check_peer(op, ctx.client_org(), ctx.peer_org())?;
        tracing::debug!(
            tx_id = %ctx.tx_id(),
            operation = %op,
            client_org = %ctx.client_org(),
            peer_org = %ctx.peer_org(),
            "Invoking contract"
        );
        self.dispatch(ctx, op, args)
    }
}

fn expect_args<const N: usize>(op: Operation, args: &[String]) -> Result<[&str; N]> {
    if args.len() != N {
        return Err(PrivassetError::invalid_input(format!(
            "{op} expects {N} argument(s), got {}",
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

fn transient_payload<T: DeserializeOwned>(ctx: &TxContext<'_>, key: &str) -> Result<T> {
    let bytes = ctx
        .transient(key)
        .ok_or_else(|| PrivassetError::MissingTransient(key.to_string()))?;
    decode_transient(key, bytes)
}
