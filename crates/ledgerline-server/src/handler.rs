//! Request handlers.
//!
//! Every response body is indented JSON.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ledgerline::{Block, ChainSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ServerError, ServerResult};
use crate::router::SharedLedger;

/// Indented JSON response body.
#[derive(Debug, Clone)]
pub struct Pretty<T>(pub T);

impl<T: Serialize> IntoResponse for Pretty<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.0) {
            Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Body of `POST /blocks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteRequest {
    pub data: String,
}

/// Body returned by `PUT /blockchain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceResponse {
    pub replaced: bool,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub length: usize,
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "malformed request body");
            Err(ServerError::BadRequest(rejection.body_text()))
        }
    }
}

/// `GET /blockchain`
pub async fn get_chain(State(ledger): State<SharedLedger>) -> Pretty<ChainSnapshot> {
    Pretty(ledger.chain())
}

/// `POST /write`: submit a block built by the client.
///
/// 201 with the block if it was appended, 409 with the block if it did not
/// extend the tip.
pub async fn submit_block(
    State(ledger): State<SharedLedger>,
    payload: Result<Json<Block>, JsonRejection>,
) -> ServerResult<(StatusCode, Pretty<Block>)> {
    let candidate = decode(payload)?;
    let outcome = ledger.submit(candidate).await;
    let status = if outcome.accepted {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Pretty(outcome.block)))
}

/// `POST /blocks`: append a block built on the server from `data`.
pub async fn create_block(
    State(ledger): State<SharedLedger>,
    payload: Result<Json<WriteRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Pretty<Block>)> {
    let request = decode(payload)?;
    let block = ledger.write(&request.data).await?;
    Ok((StatusCode::CREATED, Pretty(block)))
}

/// `PUT /blockchain`: offer a replacement chain.
pub async fn replace_chain(
    State(ledger): State<SharedLedger>,
    payload: Result<Json<Vec<Block>>, JsonRejection>,
) -> ServerResult<Pretty<ReplaceResponse>> {
    let candidate = decode(payload)?;
    let replaced = ledger.replace(candidate).await;
    Ok(Pretty(ReplaceResponse {
        replaced,
        length: ledger.len(),
    }))
}

/// `GET /health`
pub async fn health(State(ledger): State<SharedLedger>) -> Pretty<HealthResponse> {
    Pretty(HealthResponse {
        status: "ok".to_string(),
        length: ledger.len(),
    })
}
