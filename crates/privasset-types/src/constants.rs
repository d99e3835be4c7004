//! System-wide constants for privasset.

/// `objectType` tag written on asset records by default callers.
pub const ASSET_OBJECT_TYPE: &str = "asset";

/// Composite-key object type for transfer agreement records (public
/// commitment and the buyer's private bid).
pub const TRANSFER_AGREEMENT_OBJECT_TYPE: &str = "transferAgreement";

/// Transient key carrying the `CreateAsset` payload.
pub const TRANSIENT_ASSET_PROPERTIES: &str = "asset_properties";

/// Transient key carrying the `AgreeToTransfer` payload.
pub const TRANSIENT_ASSET_VALUE: &str = "asset_value";

/// Transient key carrying the `TransferAsset` payload.
pub const TRANSIENT_ASSET_OWNER: &str = "asset_owner";

/// Transient key carrying the `DeleteAsset` payload.
pub const TRANSIENT_ASSET_DELETE: &str = "asset_delete";

/// Transient key carrying the `DeleteTransferAgreement` payload.
pub const TRANSIENT_AGREEMENT_DELETE: &str = "agreement_delete";

/// Domain separator for value commitments.
pub const COMMITMENT_DOMAIN: &[u8] = b"privasset:commitment:v1:";

/// Suffix appended to an organization's MSP id to name its private collection.
pub const PRIVATE_COLLECTION_SUFFIX: &str = "PrivateCollection";

/// Default channel name.
pub const DEFAULT_CHANNEL: &str = "mychannel";

/// Default chaincode name.
pub const DEFAULT_CHAINCODE: &str = "private";

/// Default number of endorse+commit attempts when a commit hits an MVCC conflict.
pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 3;

/// Composite keys start with this byte so they never fall in a simple-key range.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Smallest code point allowed in a simple key or composite key attribute.
pub const MIN_UNICODE_RUNE: char = '\u{0}';

/// Largest code point, used as the open upper bound of partial composite scans.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "privasset";
