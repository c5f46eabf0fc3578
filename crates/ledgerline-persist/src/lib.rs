//! # Ledgerline Persist
//!
//! Durable storage for the ledger, behind the [`PersistenceGateway`] trait.
//!
//! The ledger consults its gateway twice: once at startup through
//! [`PersistenceGateway::load`], and after every successful mutation through
//! [`PersistenceGateway::save`]. Everything else stays in memory.
//!
//! ## Backends
//!
//! - [`FileGateway`] - One pretty-printed JSON array, rewritten atomically
//! - [`SqliteGateway`] - One row per block, appended incrementally
//! - [`MemoryGateway`] - No durability; used by tests and ephemeral nodes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ledgerline_persist::{Checkpoint, FileGateway, PersistenceGateway};
//! use ledgerline_core::{genesis, GENESIS_DATA};
//!
//! async fn example() {
//!     let gateway = FileGateway::new("ledger.json");
//!
//!     if gateway.load().await.unwrap().is_none() {
//!         let chain = vec![genesis(GENESIS_DATA)];
//!         gateway.save(Checkpoint::Replaced { chain: &chain }).await.unwrap();
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Best-effort durability**: a failed save is reported to the caller but
//!   the ledger keeps the block it already accepted.
//! - **No validation**: gateways store and return what they are given. The
//!   ledger verifies recovered chains itself.

pub mod error;
pub mod file;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{PersistError, Result};
pub use file::FileGateway;
pub use memory::MemoryGateway;
pub use sqlite::SqliteGateway;
pub use traits::{Checkpoint, PersistenceGateway};
