//! Block: one immutable ledger entry.
//!
//! A block is bound to its predecessor through `prev_hash` and to its own
//! contents through `hash`. Once created it is never edited; a block with
//! any field changed is a different value and will fail validation.

use serde::{Deserialize, Serialize};

use crate::canonical::block_hash;
use crate::crypto::BlockHash;

/// Payload carried by the genesis block unless configured otherwise.
pub const GENESIS_DATA: &str = "Genesis Block";

/// A ledger block.
///
/// Serialized with the field names `index`, `timestamp`, `data`, `hash`,
/// `prevHash`. Decoding also accepts the capitalised names written by older
/// ledger files (`Index`, `PrevHash`, ...). Absent fields decode to their
/// zero value so that an incomplete candidate reaches validation and is
/// rejected there instead of at the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain. Genesis is 0.
    #[serde(alias = "Index")]
    pub index: u64,

    /// Creation time as an opaque string. Not checked for format or order.
    #[serde(alias = "Timestamp")]
    pub timestamp: String,

    /// Opaque payload.
    #[serde(alias = "Data")]
    pub data: String,

    /// Lowercase hex SHA-256 over `(index, timestamp, data, prev_hash)`.
    #[serde(alias = "Hash")]
    pub hash: String,

    /// Hash of the predecessor block. Empty for genesis.
    #[serde(alias = "PrevHash")]
    pub prev_hash: String,
}

impl Block {
    /// Build a block from its identity fields, computing the hash.
    pub fn new(
        index: u64,
        timestamp: impl Into<String>,
        data: impl Into<String>,
        prev_hash: impl Into<String>,
    ) -> Self {
        let timestamp = timestamp.into();
        let data = data.into();
        let prev_hash = prev_hash.into();
        let hash = block_hash(index, &timestamp, &data, &prev_hash).to_hex();
        Self {
            index,
            timestamp,
            data,
            hash,
            prev_hash,
        }
    }

    /// Recompute the digest over this block's stored fields.
    ///
    /// This never touches `self.hash`.
    pub fn compute_hash(&self) -> BlockHash {
        block_hash(self.index, &self.timestamp, &self.data, &self.prev_hash)
    }

    /// Whether the stored `hash` matches the recomputed digest.
    pub fn has_valid_hash(&self) -> bool {
        self.compute_hash().matches_hex(&self.hash)
    }

    /// Whether this block has the shape of a genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.prev_hash.is_empty()
    }
}
