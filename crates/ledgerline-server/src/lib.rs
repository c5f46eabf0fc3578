//! HTTP host for a Ledgerline ledger.
//!
//! Serves one ledger over a small JSON API:
//!
//! | Method | Path          | Operation                                   |
//! |--------|---------------|---------------------------------------------|
//! | GET    | `/blockchain` | Current chain                               |
//! | PUT    | `/blockchain` | Offer a longer replacement chain            |
//! | POST   | `/write`      | Submit a client-built block (201 / 409)     |
//! | POST   | `/blocks`     | Append `{"data": ...}` built on the server  |
//! | GET    | `/health`     | Liveness and chain length                   |

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{Backend, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use router::{build_router, SharedLedger};
pub use server::{open_gateway, LedgerServer};
