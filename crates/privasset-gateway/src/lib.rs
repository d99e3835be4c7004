//! # privasset-gateway
//!
//! **Client side** of the asset-transfer network. A [`Gateway`] binds one
//! organization's [`Identity`] to a peer and hands out [`Contract`] handles:
//!
//! - `submit_transaction`: sign, endorse on the peer, commit, return the
//!   function's bytes. Retried on MVCC read conflicts.
//! - `evaluate_transaction`: sign and simulate only. Nothing is committed.
//!
//! Transient payloads travel beside the signed proposal and are never
//! recorded.

pub mod gateway;
pub mod identity;
pub mod telemetry;

pub use gateway::{Contract, Gateway};
pub use identity::Identity;
pub use telemetry::init_tracing;
