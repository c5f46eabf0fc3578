//! Error types for the persistence gateways.

use thiserror::Error;

/// Errors that can occur while loading or saving a ledger.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON encoding or decoding error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored ledger exists but cannot be interpreted.
    #[error("corrupt ledger: {0}")]
    Corrupt(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// The backend cannot serve requests (poisoned lock, failed worker, injected fault).
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, PersistError>;
