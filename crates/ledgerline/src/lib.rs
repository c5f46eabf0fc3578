//! # Ledgerline
//!
//! An append-only, tamper-evident ledger of blocks. Each block carries the
//! SHA-256 digest of its own fields and the digest of its predecessor, so
//! editing any block breaks every link after it.
//!
//! ## Overview
//!
//! - **Blocks**: Immutable entries with an opaque payload
//! - **Validation**: A candidate must extend the current tip exactly
//! - **Store**: One shared [`LedgerStore`] arbitrates all mutation
//! - **Persistence**: A [`PersistenceGateway`] records every accepted change
//!
//! ## Key Concepts
//!
//! - **Tip**: The last block of the chain. Every append validates against it.
//! - **Replacement**: A strictly longer chain replaces the current one
//!   wholesale. See [`ReplacePolicy`].
//! - **Best-effort durability**: An accepted block stays accepted even if
//!   the gateway fails to record it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ledgerline::{LedgerConfig, LedgerStore};
//! use ledgerline::persist::FileGateway;
//! use ledgerline::core::create_next;
//!
//! async fn example() {
//!     // Open (or create) the ledger
//!     let ledger = LedgerStore::open(FileGateway::new("ledger.json"), LedgerConfig::default())
//!         .await
//!         .unwrap();
//!
//!     // Append on the server side
//!     let block = ledger.write("hello").await.unwrap();
//!
//!     // Or validate a block built elsewhere
//!     let candidate = create_next(&block, "world");
//!     assert!(ledger.try_append(&candidate).await);
//!
//!     // Read a frozen snapshot
//!     let chain = ledger.snapshot();
//!     assert_eq!(chain.len(), 3);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ledgerline::core` - Blocks, hashing, validation
//! - `ledgerline::persist` - Gateway trait and backends

pub mod config;
pub mod error;
pub mod ledger;

// Re-export component crates
pub use ledgerline_core as core;
pub use ledgerline_persist as persist;

// Re-export main types for convenience
pub use config::{LedgerConfig, ReplacePolicy};
pub use error::{LedgerError, Result};
pub use ledger::{ChainSnapshot, LedgerStore, SubmitOutcome};

// Re-export commonly used types
pub use ledgerline_core::{is_valid, Block, BlockHash};
pub use ledgerline_persist::{Checkpoint, PersistenceGateway};
