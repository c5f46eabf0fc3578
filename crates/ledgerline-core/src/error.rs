//! Error types for Ledgerline Core.

use thiserror::Error;

/// Why a candidate block does not extend a given tip.
///
/// Validation failure is an expected outcome, not a fault. Callers that only
/// need the verdict use [`crate::is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `expected` is `None` when the tip index cannot be incremented.
    #[error("invalid index: expected {expected:?}, got {got}")]
    InvalidIndex { expected: Option<u64>, got: u64 },

    #[error("prev_hash does not link to tip: expected {expected:?}, got {got:?}")]
    BrokenLink { expected: String, got: String },

    #[error("hash mismatch: computed {computed}, claimed {claimed:?}")]
    HashMismatch { computed: String, claimed: String },
}

/// Errors from whole-chain verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain is empty")]
    Empty,

    #[error("invalid genesis block: {0}")]
    InvalidGenesis(String),

    #[error("chain broken at position {position}: {source}")]
    Broken {
        position: usize,
        #[source]
        source: ValidationError,
    },
}
