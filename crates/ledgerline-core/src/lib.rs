//! # Ledgerline Core
//!
//! Pure primitives for the Ledgerline ledger: blocks, block hashing, and
//! chain validation.
//!
//! This crate contains no I/O, no storage, no networking. The only ambient
//! input is the wall clock, read when a new block is stamped.
//!
//! ## Key Types
//!
//! - [`Block`] - One immutable ledger entry
//! - [`BlockHash`] - SHA-256 digest of a block's identity fields
//! - [`ValidationError`] - Which linkage check a candidate failed
//! - [`ChainError`] - Where a full chain breaks
//!
//! ## Hashing
//!
//! Block digests are computed over a fixed concatenation of the identity
//! fields. See the [`canonical`] module for the exact byte layout.

pub mod block;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod factory;
pub mod validation;

pub use block::{Block, GENESIS_DATA};
pub use canonical::{block_hash, canonical_input, render_index};
pub use crypto::BlockHash;
pub use error::{ChainError, ValidationError};
pub use factory::{create_next, create_next_at, genesis, genesis_at, now_timestamp};
pub use validation::{check_block, is_valid, verify_chain};
