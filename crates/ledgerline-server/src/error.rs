use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledgerline::persist::PersistError;
use ledgerline::LedgerError;
use serde_json::json;
use thiserror::Error;

use crate::handler::Pretty;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The request body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Ledger(LedgerError::Rejected(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::BadRequest(_) | Self::Ledger(LedgerError::Rejected(_)) => self.to_string(),
            // Internal details go to the log, not the client.
            _ => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_string()
            }
        };

        (status, Pretty(json!({ "error": message }))).into_response()
    }
}
