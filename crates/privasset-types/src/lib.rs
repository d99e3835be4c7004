//! # privasset-types
//!
//! Shared types, errors, and configuration for the **privasset** confidential
//! asset-transfer workflow.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AssetId`], [`OrgId`], [`CollectionName`], [`TxId`]
//! - **Asset model**: [`Asset`], [`AssetPrivateDetails`], [`AssetState`]
//! - **Agreement model**: [`TransferAgreement`], [`BuyerBid`], [`ValueCommitment`]
//! - **Confidential payloads**: [`NewAsset`], [`ValueDeclaration`], [`OwnerChange`]
//! - **Configuration**: [`NetworkConfig`], [`OrgConfig`], [`GatewayConfig`]
//! - **Errors**: [`PrivassetError`] with `PA_ERR_` prefix codes
//! - **Constants**: object types, transient keys, defaults

pub mod agreement;
pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod transient;

pub use agreement::*;
pub use asset::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use transient::*;

// Constants are accessed via `privasset_types::constants::FOO`.
