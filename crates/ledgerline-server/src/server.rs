use std::sync::Arc;

use ledgerline::persist::{FileGateway, MemoryGateway, SqliteGateway};
use ledgerline::{LedgerStore, PersistenceGateway};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{Backend, ServerConfig};
use crate::error::ServerResult;
use crate::router::{build_router, SharedLedger};

/// Open the gateway selected by `config`.
pub fn open_gateway(config: &ServerConfig) -> ServerResult<Box<dyn PersistenceGateway>> {
    let gateway: Box<dyn PersistenceGateway> = match config.backend {
        Backend::Memory => Box::new(MemoryGateway::new()),
        Backend::File => Box::new(FileGateway::new(&config.data_path)),
        Backend::Sqlite => Box::new(SqliteGateway::open(&config.data_path)?),
    };
    Ok(gateway)
}

/// Ledger HTTP server.
pub struct LedgerServer {
    config: ServerConfig,
    ledger: SharedLedger,
}

impl LedgerServer {
    /// Open the configured backend and recover the ledger.
    ///
    /// Fails if the stored ledger cannot be loaded or verified; the server
    /// must not start in that case.
    pub async fn start(config: ServerConfig) -> ServerResult<Self> {
        let gateway = open_gateway(&config)?;
        let ledger = LedgerStore::open(gateway, config.ledger.clone()).await?;
        info!(
            backend = ?config.backend,
            path = %config.data_path.display(),
            blocks = ledger.len(),
            "ledger ready"
        );
        Ok(Self {
            config,
            ledger: Arc::new(ledger),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.ledger))
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("ledger server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("ledger server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
