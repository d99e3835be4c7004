//! End-to-end: two organizations, each with its own gateway and peer,
//! driving the asset-transfer contract through signed proposals.

use std::sync::Arc;
use std::thread;

use privasset_contract::AssetTransferContract;
use privasset_gateway::{Gateway, Identity};
use privasset_ledger::{Chaincode, Ledger, TransientMap, TxContext};
use privasset_types::{
    Asset, AssetPrivateDetails, GatewayConfig, NetworkConfig, OrgId, PrivassetError, Result,
    constants, payloads,
};

struct Orgs {
    ledger: Arc<Ledger>,
    chaincode: Arc<dyn Chaincode>,
    org1: Gateway,
    org2: Gateway,
}

fn identity(org: &str, seed: u8) -> Identity {
    Identity::from_secret_bytes(OrgId::new(org), &[seed; 32])
}

fn connect(ledger: &Arc<Ledger>, identity: Identity, peer: &str) -> Gateway {
    Gateway::connect(
        Arc::clone(ledger),
        identity,
        OrgId::new(peer),
        GatewayConfig::default(),
    )
    .unwrap()
}

fn setup() -> Orgs {
    let config = NetworkConfig::two_orgs();
    let ledger = Arc::new(Ledger::new(config.clone()).unwrap());
    let org1 = identity("Org1MSP", 1);
    let org2 = identity("Org2MSP", 2);
    ledger.register_org(org1.org().clone(), org1.verifying_key()).unwrap();
    ledger.register_org(org2.org().clone(), org2.verifying_key()).unwrap();
    Orgs {
        chaincode: Arc::new(AssetTransferContract::new(config)),
        org1: connect(&ledger, org1, "Org1MSP"),
        org2: connect(&ledger, org2, "Org2MSP"),
        ledger,
    }
}

fn transient(key: &str, payload: Vec<u8>) -> TransientMap {
    TransientMap::from([(key.to_string(), payload)])
}

impl Orgs {
    fn submit(
        &self,
        gateway: &Gateway,
        function: &str,
        key: &str,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>> {
        gateway
            .contract(Arc::clone(&self.chaincode))
            .submit_transaction(function, &[], transient(key, payload))
    }

    fn evaluate(&self, gateway: &Gateway, function: &str, args: &[&str]) -> Result<Vec<u8>> {
        gateway
            .contract(Arc::clone(&self.chaincode))
            .evaluate_transaction(function, args)
    }

    fn private(
        &self,
        gateway: &Gateway,
        collection: &str,
        asset_id: &str,
    ) -> Option<AssetPrivateDetails> {
        let bytes = self
            .evaluate(gateway, "ReadAssetPrivateDetails", &[collection, asset_id])
            .unwrap();
        (!bytes.is_empty()).then(|| serde_json::from_slice(&bytes).unwrap())
    }
}

#[test]
fn create_agree_transfer_flow() {
    let orgs = setup();

    let out = orgs
        .submit(
            &orgs.org1,
            "CreateAsset",
            constants::TRANSIENT_ASSET_PROPERTIES,
            payloads::asset_properties("asset1", "green", 20, 100),
        )
        .unwrap();
    assert!(out.is_empty());

    let bytes = orgs.evaluate(&orgs.org2, "ReadAsset", &["asset1"]).unwrap();
    let asset: Asset = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(asset.owner_org.as_str(), "Org1MSP");
    assert_eq!(orgs.private(&orgs.org2, "Org1MSPPrivateCollection", "asset1"), None);

    orgs.submit(
        &orgs.org2,
        "AgreeToTransfer",
        constants::TRANSIENT_ASSET_VALUE,
        payloads::asset_value("asset1", 100),
    )
    .unwrap();
    orgs.submit(
        &orgs.org1,
        "TransferAsset",
        constants::TRANSIENT_ASSET_OWNER,
        payloads::asset_owner("asset1", "Org2MSP"),
    )
    .unwrap();

    let bytes = orgs.evaluate(&orgs.org1, "ReadAsset", &["asset1"]).unwrap();
    let asset: Asset = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(asset.owner_org.as_str(), "Org2MSP");
    let details = orgs
        .private(&orgs.org2, "Org2MSPPrivateCollection", "asset1")
        .unwrap();
    assert_eq!(details.appraised_value, 100);
    assert_eq!(orgs.private(&orgs.org1, "Org1MSPPrivateCollection", "asset1"), None);

    assert_eq!(orgs.ledger.height().unwrap(), 3);
    assert!(orgs.ledger.verify_chain().unwrap());
}

#[test]
fn transient_values_never_reach_blocks() {
    let orgs = setup();
    orgs.submit(
        &orgs.org1,
        "CreateAsset",
        constants::TRANSIENT_ASSET_PROPERTIES,
        payloads::asset_properties("asset1", "ultraviolet", 20, 987_654_321_123),
    )
    .unwrap();

    let block = orgs.ledger.block(1).unwrap().unwrap();
    let recorded = serde_json::to_string(&block).unwrap();
    assert!(!recorded.contains("ultraviolet"));
    assert!(!recorded.contains("987654321123"));
    assert_eq!(block.transaction.function, "CreateAsset");
    assert!(block.transaction.args.is_empty());
}

#[test]
fn evaluate_commits_nothing() {
    let orgs = setup();
    let err = orgs.evaluate(&orgs.org1, "ReadAsset", &["asset1"]).unwrap_err();
    assert!(matches!(err, PrivassetError::NotFound { .. }));
    assert_eq!(orgs.ledger.height().unwrap(), 0);
}

#[test]
fn unregistered_identity_rejected() {
    let orgs = setup();
    let impostor = connect(&orgs.ledger, identity("Org1MSP", 9), "Org1MSP");
    let err = orgs
        .submit(
            &impostor,
            "CreateAsset",
            constants::TRANSIENT_ASSET_PROPERTIES,
            payloads::asset_properties("asset1", "green", 20, 100),
        )
        .unwrap_err();
    assert!(matches!(err, PrivassetError::InvalidSignature(_)));
    assert_eq!(orgs.ledger.height().unwrap(), 0);
}

#[test]
fn client_cannot_write_through_foreign_peer() {
    let orgs = setup();
    let org1_on_org2_peer = connect(&orgs.ledger, identity("Org1MSP", 1), "Org2MSP");
    let err = orgs
        .submit(
            &org1_on_org2_peer,
            "CreateAsset",
            constants::TRANSIENT_ASSET_PROPERTIES,
            payloads::asset_properties("asset1", "green", 20, 100),
        )
        .unwrap_err();
    assert!(matches!(err, PrivassetError::Unauthorized { .. }));
}

/// Read-modify-write on one key; concurrent submits conflict at commit.
struct Counter;

impl Chaincode for Counter {
    fn invoke(
        &self,
        ctx: &mut TxContext<'_>,
        _function: &str,
        _args: &[String],
    ) -> Result<Vec<u8>> {
        let current = ctx
            .get_state("counter")?
            .map(|b| String::from_utf8_lossy(&b).parse::<u64>().unwrap_or(0))
            .unwrap_or(0);
        let next = (current + 1).to_string().into_bytes();
        ctx.put_state("counter", next.clone())?;
        Ok(next)
    }
}

#[test]
fn conflicting_submits_are_retried() {
    let config = NetworkConfig::two_orgs();
    let ledger = Arc::new(Ledger::new(config).unwrap());
    let chaincode: Arc<dyn Chaincode> = Arc::new(Counter);
    let gateway_config = GatewayConfig {
        max_commit_attempts: 1_000,
        ..GatewayConfig::default()
    };

    let writer = identity("Org1MSP", 10);
    ledger.register_org(writer.org().clone(), writer.verifying_key()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            let chaincode = Arc::clone(&chaincode);
            let cfg = gateway_config.clone();
            thread::spawn(move || {
                let id = identity("Org1MSP", 10);
                let gateway = Gateway::connect(ledger, id, OrgId::new("Org1MSP"), cfg).unwrap();
                let contract = gateway.contract(chaincode);
                for _ in 0..10 {
                    contract
                        .submit_transaction("Increment", &[], TransientMap::new())
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reader = identity("Org2MSP", 50);
    ledger.register_org(reader.org().clone(), reader.verifying_key()).unwrap();
    let gateway = connect(&ledger, reader, "Org2MSP");
    let value = gateway
        .contract(chaincode)
        .evaluate_transaction("Read", &[])
        .unwrap();
    // Evaluate runs the increment against the snapshot without committing.
    assert_eq!(value, b"41");
    assert_eq!(ledger.height().unwrap(), 40);
}
