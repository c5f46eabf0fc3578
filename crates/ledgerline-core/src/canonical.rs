//! Canonical hash input for blocks.
//!
//! The digest of a block is `SHA-256(index || timestamp || data || prev_hash)`
//! where `||` is plain byte concatenation with no separators and:
//!
//! - `index` is rendered as minimal ASCII decimal digits: no sign, no leading
//!   zeros, no grouping (`0`, `1`, `18446744073709551615`)
//! - `timestamp`, `data` and `prev_hash` are their UTF-8 bytes, unmodified
//!
//! The index rendering is fixed so that digests reproduce across restarts
//! and across implementations. Changing it invalidates every stored chain.

use crate::crypto::BlockHash;

/// Render a block index in its canonical textual form.
pub fn render_index(index: u64) -> String {
    index.to_string()
}

/// Build the exact bytes that are hashed for a block.
pub fn canonical_input(index: u64, timestamp: &str, data: &str, prev_hash: &str) -> Vec<u8> {
    let index = render_index(index);
    let mut buf =
        Vec::with_capacity(index.len() + timestamp.len() + data.len() + prev_hash.len());
    buf.extend_from_slice(index.as_bytes());
    buf.extend_from_slice(timestamp.as_bytes());
    buf.extend_from_slice(data.as_bytes());
    buf.extend_from_slice(prev_hash.as_bytes());
    buf
}

/// Hash a block's four identity fields.
pub fn block_hash(index: u64, timestamp: &str, data: &str, prev_hash: &str) -> BlockHash {
    BlockHash::digest(&canonical_input(index, timestamp, data, prev_hash))
}
