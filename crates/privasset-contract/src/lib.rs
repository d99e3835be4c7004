//! # privasset-contract
//!
//! **Asset-transfer contract**: the business rules for confidential,
//! multi-organization asset transfers.
//!
//! ## Components
//!
//! - [`public_ledger`] and [`private_store`]: typed adapters over the
//!   transaction context's public state and private collections
//! - [`guard`]: decides from the caller's organization whether an
//!   operation may proceed
//! - [`state_machine`]: asset create / read / range / delete and derived state
//! - [`agreement`]: buyer value commitments
//! - [`transfer`]: the atomic ownership change and private-data migration
//! - [`contract`]: [`AssetTransferContract`], the function-name dispatcher
//!   plugged into the ledger as its [`Chaincode`](privasset_ledger::Chaincode)
//!
//! Every operation runs inside one simulation. All checks happen before any
//! write is staged, and a failed simulation is never committed, so a rejected
//! call leaves every record untouched.

pub mod agreement;
pub mod contract;
pub mod guard;
pub mod private_store;
pub mod public_ledger;
pub mod state_machine;
pub mod transfer;

#[cfg(test)]
mod testkit;

pub use agreement::AgreementManager;
pub use contract::AssetTransferContract;
pub use guard::{AuthorizationGuard, Operation};
pub use state_machine::AssetStateMachine;
pub use transfer::TransferExecutor;
