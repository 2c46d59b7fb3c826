use axum::body::{to_bytes, Body};
use hyper::Request;
use serde_json::{json, Value as J};
use tower::ServiceExt;

use doctoc_mcp_gateway::clients::doctoc::DoctocClient;
use doctoc_mcp_gateway::clients::unipile::UnipileClient;
use doctoc_mcp_gateway::infra::config::{DoctocConfig, UnipileConfig};
use doctoc_mcp_gateway::infra::http_app::build_app;
use doctoc_mcp_gateway::tools::registry::ToolRegistry;

const BODY_LIMIT: usize = 1024 * 1024;

fn registry(doctoc_base: String, unipile_dsn: String) -> ToolRegistry {
    ToolRegistry::with_clients(
        DoctocClient::new(&DoctocConfig {
            base_url: doctoc_base,
            api_token: "tok".into(),
            org_id: "org-1".into(),
        }),
        UnipileClient::new(&UnipileConfig {
            dsn: unipile_dsn,
            api_key: "key".into(),
        }),
    )
}

async fn post_rpc(app: axum::Router, body: String) -> J {
    let req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_returns_ok() {
    let app = build_app(registry("http://127.0.0.1:9".into(), "http://127.0.0.1:9".into()));
    let req = Request::builder()
        .method("GET")
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn http_e2e_tools_list_and_call() {
    let doctoc = httpmock::MockServer::start();
    doctoc.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/getOrganizationInfoAPI")
            .json_body(json!({"sections": ["basic"], "orgID": "org-1"}));
        then.status(200)
            .json_body(json!({"name": "Clinica Central", "phone": "999"}));
    });

    let app = build_app(registry(doctoc.base_url(), "http://127.0.0.1:9".into()));

    let v = post_rpc(
        app.clone(),
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#.into(),
    )
    .await;
    assert_eq!(v["result"]["tools"].as_array().unwrap().len(), 30);

    let v = post_rpc(
        app,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_org_basic_info","arguments":{}}}"#.into(),
    )
    .await;
    let text = v["result"]["content"][0]["text"].as_str().unwrap();
    let expected =
        serde_json::to_string_pretty(&json!({"name": "Clinica Central", "phone": "999"})).unwrap();
    assert_eq!(text, expected);
    assert!(v["result"].get("isError").is_none());
}

#[tokio::test]
async fn http_e2e_upstream_failure_is_an_error_envelope_not_an_rpc_error() {
    let doctoc = httpmock::MockServer::start();
    doctoc.mock(|when, then| {
        when.method(httpmock::Method::POST).path("/getPatientQuoteAPI");
        then.status(500).body("interno");
    });

    let app = build_app(registry(doctoc.base_url(), "http://127.0.0.1:9".into()));
    let v = post_rpc(
        app,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_patient_appointments","arguments":{"patientID":"p1"}}}"#.into(),
    )
    .await;

    assert!(v.get("error").is_none(), "upstream failures stay in-envelope");
    assert_eq!(v["result"]["isError"], true);
    assert_eq!(
        v["result"]["content"][0]["text"],
        "Error: Doctoc getPatientQuoteAPI (500): interno"
    );
}

#[tokio::test]
async fn http_e2e_send_telegram_message() {
    let unipile = httpmock::MockServer::start();
    let m = unipile.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/api/v1/chats/c1/messages")
            .header("x-api-key", "key")
            .body_contains("name=\"text\"")
            .body_contains("hola");
        then.status(200).json_body(json!({"message_id": "m1"}));
    });

    let app = build_app(registry("http://127.0.0.1:9".into(), unipile.base_url()));
    let v = post_rpc(
        app,
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"send_telegram_message","arguments":{"chat_id":"c1","text":"hola"}}}"#.into(),
    )
    .await;

    m.assert();
    assert!(v["result"].get("isError").is_none());
}
