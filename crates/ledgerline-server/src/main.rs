//! ledgerline-server - serve a Ledgerline ledger over HTTP

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ledgerline::ReplacePolicy;
use ledgerline_server::{Backend, LedgerServer, ServerConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Serve a Ledgerline ledger over HTTP
#[derive(Parser, Debug)]
#[command(name = "ledgerline-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Persistence backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Ledger file or database path
    #[arg(long)]
    data_path: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Only accept replacement chains that pass full verification
    #[arg(long)]
    verified_replace: bool,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(data_path) = self.data_path {
            config.data_path = data_path;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if self.verified_replace {
            config.ledger.replace_policy = ReplacePolicy::Verified;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let server = LedgerServer::start(config)
        .await
        .context("failed to recover ledger; refusing to start")?;
    server.serve().await.context("server error")?;
    Ok(())
}
