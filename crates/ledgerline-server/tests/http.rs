//! HTTP API tests driven through the router without a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use ledgerline::core::{create_next, create_next_at};
use ledgerline::persist::MemoryGateway;
use ledgerline::{Block, LedgerConfig, LedgerStore, PersistenceGateway};
use ledgerline_server::{build_router, SharedLedger};
use ledgerline_testkit::{fork_of, TestChain};
use serde_json::{json, Value};
use tower::util::ServiceExt;

async fn ledger_from(gateway: MemoryGateway) -> SharedLedger {
    let gateway: Box<dyn PersistenceGateway> = Box::new(gateway);
    Arc::new(LedgerStore::open(gateway, LedgerConfig::default()).await.unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body)
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, Some(body.to_string())).await;
    (status, serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn get_chain_returns_indented_genesis() {
    let ledger = ledger_from(MemoryGateway::new()).await;
    let app = build_router(ledger);

    let (status, text) = send(&app, Method::GET, "/blockchain", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("\n  "), "not indented: {text}");

    let chain: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0]["index"], 0);
    assert_eq!(chain[0]["data"], "Genesis Block");
    assert_eq!(chain[0]["prevHash"], "");
}

#[tokio::test]
async fn submit_valid_block_is_created() {
    let ledger = ledger_from(MemoryGateway::new()).await;
    let app = build_router(Arc::clone(&ledger));

    let candidate = create_next(&ledger.tip(), "hello");
    let body = serde_json::to_value(&candidate).unwrap();
    let (status, echoed) = send_json(&app, Method::POST, "/write", body).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(serde_json::from_value::<Block>(echoed).unwrap(), candidate);
    assert_eq!(ledger.len(), 2);
}

#[tokio::test]
async fn submit_stale_block_conflicts() {
    let ledger = ledger_from(MemoryGateway::new()).await;
    let app = build_router(Arc::clone(&ledger));
    let genesis = ledger.tip();

    let first = create_next(&genesis, "hello");
    let (status, _) = send_json(&app, Method::POST, "/write", serde_json::to_value(&first).unwrap()).await;
    assert_eq!(status, StatusCode::CREATED);

    // A second block claiming index 1.
    let second = create_next(&genesis, "again");
    let (status, echoed) =
        send_json(&app, Method::POST, "/write", serde_json::to_value(&second).unwrap()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(echoed["data"], "again");
    assert_eq!(ledger.len(), 2);
}

#[tokio::test]
async fn submit_accepts_legacy_field_names() {
    let ledger = ledger_from(MemoryGateway::new()).await;
    let app = build_router(Arc::clone(&ledger));
    let next = create_next(&ledger.tip(), "hello");

    let body = json!({
        "Index": next.index,
        "Timestamp": next.timestamp,
        "Data": next.data,
        "Hash": next.hash,
        "PrevHash": next.prev_hash,
    });
    let (status, echoed) = send_json(&app, Method::POST, "/write", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(echoed["prevHash"], next.prev_hash.as_str());
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let ledger = ledger_from(MemoryGateway::new()).await;
    let app = build_router(Arc::clone(&ledger));

    let cases = [
        "not json".to_string(),
        r#"{"index": "one"}"#.to_string(),
        r#"{"index": -1}"#.to_string(),
        "[1, 2, 3]".to_string(),
    ];
    for body in cases {
        let (status, text) = send(&app, Method::POST, "/write", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        let error: Value = serde_json::from_str(&text).unwrap();
        assert!(error["error"].is_string());
        assert!(text.contains("\n  "), "not indented: {text}");
    }
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn empty_object_is_well_formed_but_rejected() {
    let ledger = ledger_from(MemoryGateway::new()).await;
    let app = build_router(ledger);

    let (status, echoed) = send_json(&app, Method::POST, "/write", json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(echoed["index"], 0);
}

#[tokio::test]
async fn create_block_builds_on_tip() {
    let ledger = ledger_from(MemoryGateway::new()).await;
    let app = build_router(Arc::clone(&ledger));
    let genesis = ledger.tip();

    let (status, block) = send_json(&app, Method::POST, "/blocks", json!({ "data": "hello" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(block["index"], 1);
    assert_eq!(block["data"], "hello");
    assert_eq!(block["prevHash"], genesis.hash.as_str());

    let (status, _) = send_json(&app, Method::POST, "/blocks", json!({ "payload": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replace_chain_requires_longer() {
    let base = TestChain::new(3);
    let ledger = ledger_from(base.memory_gateway()).await;
    let app = build_router(Arc::clone(&ledger));

    let same = serde_json::to_value(fork_of(base.blocks(), 1, 2)).unwrap();
    let (status, body) = send_json(&app, Method::PUT, "/blockchain", same).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "replaced": false, "length": 3 }));

    let longer = fork_of(base.blocks(), 1, 4);
    let (status, body) =
        send_json(&app, Method::PUT, "/blockchain", serde_json::to_value(&longer).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "replaced": true, "length": 5 }));
    assert_eq!(ledger.snapshot().to_vec(), longer);
}

#[tokio::test]
async fn health_reports_length() {
    let base = TestChain::new(4);
    let ledger = ledger_from(base.memory_gateway()).await;
    let app = build_router(ledger);

    let (status, text) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body, json!({ "status": "ok", "length": 4 }));
}

#[tokio::test]
async fn failed_save_still_accepts() {
    let gateway = Arc::new(MemoryGateway::new());
    let boxed: Box<dyn PersistenceGateway> = Box::new(Arc::clone(&gateway));
    let ledger: SharedLedger = Arc::new(LedgerStore::open(boxed, LedgerConfig::default()).await.unwrap());
    let app = build_router(Arc::clone(&ledger));

    gateway.set_fail_saves(true);
    let candidate = create_next_at(&ledger.tip(), "unsaved", "2024-01-01T00:00:01+00:00");
    let (status, _) =
        send_json(&app, Method::POST, "/write", serde_json::to_value(&candidate).unwrap()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ledger.len(), 2);
    assert_eq!(gateway.saved_chain().unwrap().len(), 1);
}
