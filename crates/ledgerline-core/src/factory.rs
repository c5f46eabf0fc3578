//! Block construction: genesis and tip extension.
//!
//! Construction is pure. Nothing here touches a ledger; appending the
//! result is the caller's job.

use chrono::{SecondsFormat, Utc};

use crate::block::Block;

/// Current UTC time as an RFC 3339 string with nanosecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Create a genesis block stamped with the current time.
pub fn genesis(data: &str) -> Block {
    genesis_at(data, now_timestamp())
}

/// Create a genesis block with an explicit timestamp.
pub fn genesis_at(data: &str, timestamp: impl Into<String>) -> Block {
    Block::new(0, timestamp, data, "")
}

/// Create the block that extends `tip` with `data`, stamped now.
pub fn create_next(tip: &Block, data: &str) -> Block {
    create_next_at(tip, data, now_timestamp())
}

/// Create the block that extends `tip` with an explicit timestamp.
///
/// The index wraps at `u64::MAX`. A wrapped block never validates against
/// its tip, so no ledger can accept it.
pub fn create_next_at(tip: &Block, data: &str, timestamp: impl Into<String>) -> Block {
    Block::new(tip.index.wrapping_add(1), timestamp, data, tip.hash.clone())
}
