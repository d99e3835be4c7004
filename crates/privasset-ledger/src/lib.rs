//! # privasset-ledger
//!
//! **Ledger substrate**: the shared, append-only store the asset-transfer
//! contract runs against.
//!
//! ## Architecture
//!
//! A transaction flows through two steps:
//! 1. **Endorse**: verify the proposal signature against the creator
//!    organization's registered key, then simulate the chaincode against a
//!    read snapshot. Simulation never mutates state; it produces a
//!    [`TxRwSet`] (versions read, values written).
//! 2. **Commit**: under the write lock, re-check every recorded read version
//!    and range (optimistic concurrency control). If anything moved, the
//!    transaction is rejected with `MvccReadConflict` and nothing is applied.
//!    Otherwise all public and private writes land together in one block.
//!
//! ## Private collections
//!
//! Each organization owns a collection. A peer of a non-member organization
//! does not hold the collection's data: its reads come back empty. Writes to
//! any defined collection are allowed, and the block records only their
//! SHA-256 hashes.

pub mod block;
pub mod chaincode;
pub mod collection;
pub mod composite;
pub mod context;
pub mod ledger;
pub mod msp;
pub mod proposal;
pub mod rwset;
pub mod state;

pub use block::{Block, CommitStatus, PrivateWriteHash, TransactionRecord};
pub use chaincode::Chaincode;
pub use collection::CollectionRegistry;
pub use composite::{create_composite_key, split_composite_key};
pub use context::{StateRange, TransientMap, TxContext};
pub use ledger::{Ledger, Simulation};
pub use msp::MembershipRegistry;
pub use proposal::{Proposal, SignedProposal};
pub use rwset::{CollectionRwSet, PublicRwSet, RangeQueryInfo, TxRwSet};
pub use state::{Height, VersionedValue, WorldState};
