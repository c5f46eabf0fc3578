//! Golden test vectors for block hashing.
//!
//! Any implementation that reads or writes Ledgerline files must produce
//! these digests for these fields.

use ledgerline_core::block_hash;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub index: u64,
    pub timestamp: &'static str,
    pub data: &'static str,
    pub prev_hash: &'static str,
    /// Expected digest (lowercase hex).
    pub expected_hash: &'static str,
}

/// Digest of the genesis vector, used as `prev_hash` of the second one.
pub const GENESIS_HASH: &str = "011cafcdcc8403a617d7d51b5abf819d1a6b646643763e9969bed8d6b86a129e";

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis",
            index: 0,
            timestamp: "2024-01-01T00:00:00+00:00",
            data: "Genesis Block",
            prev_hash: "",
            expected_hash: GENESIS_HASH,
        },
        GoldenVector {
            name: "first block after genesis",
            index: 1,
            timestamp: "2024-01-01T00:00:01+00:00",
            data: "hello",
            prev_hash: GENESIS_HASH,
            expected_hash: "ed20b3ff12043c57edabb0e3b6c4ae1646af500bb30db3d955fd6f70c9dd8b33",
        },
        GoldenVector {
            name: "all fields empty",
            index: 0,
            timestamp: "",
            data: "",
            prev_hash: "",
            // sha256("0")
            expected_hash: "5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9",
        },
        GoldenVector {
            name: "maximum index",
            index: u64::MAX,
            timestamp: "t",
            data: "x",
            prev_hash: "ab",
            expected_hash: "9cdf130232cd3a21f6129e4a8810abd335b3eb548967c989212c13534738b8d1",
        },
        GoldenVector {
            name: "non-ascii payload",
            index: 7,
            timestamp: "2024-06-30T12:00:00Z",
            data: "h\u{e9}llo w\u{f6}rld \u{2713}",
            prev_hash: "0000000000000000000000000000000000000000000000000000000000000000",
            expected_hash: "6521218b0a7e2ebb213f0b046ff80c52f23c3a4dc731ff77c7c5896a93133316",
        },
    ]
}

/// Recompute every vector, returning the names of those that disagree.
pub fn verify_all_vectors() -> Result<(), Vec<&'static str>> {
    let failures: Vec<&'static str> = all_vectors()
        .into_iter()
        .filter(|v| {
            block_hash(v.index, v.timestamp, v.data, v.prev_hash).to_hex() != v.expected_hash
        })
        .map(|v| v.name)
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_core::{genesis_at, Block};

    #[test]
    fn test_all_vectors_match() {
        assert_eq!(verify_all_vectors(), Ok(()));
    }

    #[test]
    fn test_vectors_match_block_constructor() {
        for v in all_vectors() {
            let block = Block::new(v.index, v.timestamp, v.data, v.prev_hash);
            assert_eq!(block.hash, v.expected_hash, "vector {}", v.name);
        }
    }

    #[test]
    fn test_genesis_vector_matches_factory() {
        let g = genesis_at("Genesis Block", "2024-01-01T00:00:00+00:00");
        assert_eq!(g.hash, GENESIS_HASH);
    }
}
