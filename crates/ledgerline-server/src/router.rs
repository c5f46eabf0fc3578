use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use ledgerline::{LedgerStore, PersistenceGateway};
use tower_http::trace::TraceLayer;

use crate::handler;

/// The ledger as shared by every handler.
pub type SharedLedger = Arc<LedgerStore<Box<dyn PersistenceGateway>>>;

/// Build the axum router with all ledger endpoints.
pub fn build_router(ledger: SharedLedger) -> Router {
    Router::new()
        .route(
            "/blockchain",
            get(handler::get_chain).put(handler::replace_chain),
        )
        .route("/write", post(handler::submit_block))
        .route("/blocks", post(handler::create_block))
        .route("/health", get(handler::health))
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}
