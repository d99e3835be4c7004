//! Append-only block log.
//!
//! Each committed transaction becomes one block. The block records the
//! signed invocation (function and positional arguments), the public writes,
//! and only hashes of private writes. Transient data never appears here.

use chrono::{DateTime, Utc};
use privasset_types::{CollectionName, OrgId, TxId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest of one private write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateWriteHash {
    pub collection: CollectionName,
    pub key_hash: String,
    /// `None` for a delete.
    pub value_hash: Option<String>,
}

/// What the ledger permanently remembers about a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub tx_id: TxId,
    pub creator: OrgId,
    pub function: String,
    pub args: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// Public writes in key order; `None` is a delete.
    pub public_writes: Vec<(String, Option<Vec<u8>>)>,
    pub private_write_hashes: Vec<PrivateWriteHash>,
}

/// A block holding a single transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub previous_hash: [u8; 32],
    pub data_hash: [u8; 32],
    pub committed_at: DateTime<Utc>,
    pub transaction: TransactionRecord,
}

impl Block {
    /// Chain `transaction` after a block whose hash is `previous_hash`.
    pub(crate) fn seal(
        number: u64,
        previous_hash: [u8; 32],
        transaction: TransactionRecord,
    ) -> privasset_types::Result<Self> {
        let data_hash = Self::compute_data_hash(number, &previous_hash, &transaction)?;
        Ok(Self {
            number,
            previous_hash,
            data_hash,
            committed_at: Utc::now(),
            transaction,
        })
    }

    /// SHA-256 over the block number, previous hash and transaction record.
    pub fn compute_data_hash(
        number: u64,
        previous_hash: &[u8; 32],
        transaction: &TransactionRecord,
    ) -> privasset_types::Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(b"privasset:block:v1:");
        hasher.update(number.to_le_bytes());
        hasher.update(previous_hash);
        hasher.update(serde_json::to_vec(transaction)?);
        Ok(hasher.finalize().into())
    }

    /// Recompute the data hash and compare.
    #[must_use]
    pub fn verify(&self) -> bool {
        Self::compute_data_hash(self.number, &self.previous_hash, &self.transaction)
            .is_ok_and(|h| h == self.data_hash)
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    pub tx_id: TxId,
    pub block_number: u64,
}
