//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ledgerline_core::{create_next_at, genesis_at, Block, BlockHash};

/// Generate a block index.
pub fn index() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Generate an RFC 3339 UTC timestamp.
pub fn timestamp() -> impl Strategy<Value = String> {
    (2000u32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, mo, d, h, mi, s)| format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z"),
    )
}

/// Generate an arbitrary Unicode payload.
pub fn payload(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<char>(), 0..=max_len).prop_map(|chars| chars.into_iter().collect())
}

/// Generate a well-formed digest in lowercase hex.
pub fn hex_hash() -> impl Strategy<Value = String> {
    any::<[u8; 32]>().prop_map(|bytes| BlockHash::from_bytes(bytes).to_hex())
}

/// Parameters for generating a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub index: u64,
    pub timestamp: String,
    pub data: String,
    pub prev_hash: String,
}

impl BlockParams {
    /// Build the block, computing its hash.
    pub fn to_block(&self) -> Block {
        Block::new(
            self.index,
            self.timestamp.clone(),
            self.data.clone(),
            self.prev_hash.clone(),
        )
    }
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (index(), timestamp(), payload(256), hex_hash())
            .prop_map(|(index, timestamp, data, prev_hash)| BlockParams {
                index,
                timestamp,
                data,
                prev_hash,
            })
            .boxed()
    }
}

/// Generate a valid chain of 1 to `max_len` blocks.
pub fn valid_chain(max_len: usize) -> impl Strategy<Value = Vec<Block>> {
    let entries = prop::collection::vec((timestamp(), payload(64)), 1..=max_len.max(1));
    entries.prop_map(|entries| {
        let mut chain: Vec<Block> = Vec::with_capacity(entries.len());
        for (ts, data) in entries {
            let next = match chain.last() {
                Some(tip) => create_next_at(tip, &data, ts),
                None => genesis_at(&data, ts),
            };
            chain.push(next);
        }
        chain
    })
}
