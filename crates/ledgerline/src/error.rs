//! Error types for the ledger.

use ledgerline_core::{ChainError, ValidationError};
use ledgerline_persist::PersistError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// A candidate that fails validation is not an error for `try_append` and
/// `replace`; they report it through their boolean result.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Gateway error. Fatal at startup, logged and absorbed afterwards.
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    /// The stored ledger failed verification at startup.
    #[error("recovered ledger is invalid: {0}")]
    Recovery(#[from] ChainError),

    /// A block built from the tip did not validate.
    #[error("block rejected: {0}")]
    Rejected(#[from] ValidationError),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
