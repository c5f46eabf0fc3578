//! Server configuration, loaded from TOML.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ledgerline::LedgerConfig;
use serde::{Deserialize, Serialize};

use crate::error::ServerResult;

/// Where the ledger is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Nothing survives a restart.
    Memory,
    /// One JSON array file at `data_path`.
    #[default]
    File,
    /// SQLite database at `data_path`.
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Loopback by default; bind `0.0.0.0` explicitly to serve the network.
    pub bind_addr: SocketAddr,
    pub backend: Backend,
    /// Ledger file or database. Ignored by the memory backend.
    pub data_path: PathBuf,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    pub ledger: LedgerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            backend: Backend::default(),
            data_path: PathBuf::from("ledger.json"),
            log_level: "info".to_string(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read a TOML config file. Keys not present keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> ServerResult<Self> {
        Ok(toml::from_str(contents)?)
    }
}
