#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test, panics are the assertion mechanism")]

use chaos_cli::cli::Cli;
use chaos_cli::commands;
use clap::Parser;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli(server: &MockServer, args: &[&str]) -> Cli {
    let uri = server.uri();
    let mut argv = vec!["chaosctl", "--admin-url", uri.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("valid arguments")
}

async fn engine_with(config: Value, push_status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(config))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(push_status))
        .mount(&server)
        .await;
    server
}

async fn pushed_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("recording enabled")
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| r.body_json().expect("json body"))
        .collect()
}

#[tokio::test]
async fn test_set_pushes_full_configuration() {
    let server = engine_with(json!({"mode": "unified", "jitter": 5}), 200).await;

    commands::run(cli(&server, &["set", "lagToReq", "150"])).await.expect("set succeeds");

    let bodies = pushed_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["lagToReq"], json!(150));
    assert_eq!(bodies[0]["jitter"], json!(5));
    assert_eq!(bodies[0]["mode"], json!("unified"));
    assert_eq!(bodies[0]["headerRules"]["stripCORS"], json!(false));
}

#[tokio::test]
async fn test_unchanged_value_is_not_pushed() {
    let server = engine_with(json!({"failureMode": "timeout"}), 200).await;

    commands::run(cli(&server, &["set", "failureMode", "timeout"])).await.expect("no-op succeeds");
    assert!(pushed_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_preset_apply() {
    let server = engine_with(json!({}), 200).await;

    commands::run(cli(&server, &["preset", "apply", "slow4g"])).await.expect("preset applies");

    let bodies = pushed_bodies(&server).await;
    assert_eq!(bodies[0]["lagToResp"], json!(200));
    assert_eq!(bodies[0]["bandwidthUp"], json!(250));
}

#[tokio::test]
async fn test_status_rule_add_appends_to_existing() {
    let server = engine_with(
        json!({"statusRules": [{"id": "1", "pathPattern": "/api/a", "statusCode": 502, "errorRate": 10}]}),
        200,
    )
    .await;

    commands::run(cli(&server, &["status-rule", "add", "--path", "/api/b", "--rate", "150"]))
        .await
        .expect("rule added");

    let rules = pushed_bodies(&server).await[0]["statusRules"].clone();
    assert_eq!(rules.as_array().map(Vec::len), Some(2));
    assert_eq!(rules[0]["id"], json!("1"));
    assert_eq!(rules[1]["pathPattern"], json!("/api/b"));
    assert_eq!(rules[1]["statusCode"], json!(500));
    assert_eq!(rules[1]["errorRate"], json!(100));
}

#[tokio::test]
async fn test_apply_file_overlays_document() {
    let server = engine_with(json!({"targetUnified": "http://legacy:80"}), 200).await;
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("chaos.json");
    std::fs::write(&file, r#"{"chaosRoutes": "/v1, /v2", "headerRules": {"stripCache": true}}"#)
        .expect("write config");

    commands::run(cli(&server, &["apply", file.to_str().expect("utf-8 path")]))
        .await
        .expect("apply succeeds");

    let body = &pushed_bodies(&server).await[0];
    assert_eq!(body["chaosRoutes"], json!(["/v1", "/v2"]));
    assert_eq!(body["headerRules"]["stripCache"], json!(true));
    assert_eq!(body["targetUnified"], json!("http://legacy:80"));
}

#[tokio::test]
async fn test_rejected_push_is_an_error() {
    let server = engine_with(json!({}), 500).await;

    let result = commands::run(cli(&server, &["headers", "reset"])).await;
    assert!(result.is_ok(), "reset of clean headers is a no-op");

    let err = commands::run(cli(&server, &["set", "stripCORS", "on"]))
        .await
        .expect_err("push rejected");
    assert!(err.to_string().contains("Error"));
}

#[tokio::test]
async fn test_unknown_field_is_reported() {
    let server = engine_with(json!({}), 200).await;

    let err = commands::run(cli(&server, &["set", "latency", "5"]))
        .await
        .expect_err("unknown key");
    assert!(err.to_string().contains("latency"));
    assert!(pushed_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_preset_list_reads_current_preset() {
    let server = engine_with(json!({"lagToReq": 300, "lagToResp": 400, "bandwidthUp": 40, "bandwidthDown": 100, "jitter": 200}), 200).await;

    commands::run(cli(&server, &["preset", "list"])).await.expect("list succeeds");
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(pushed_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_preset_list_without_engine() {
    let argv = ["chaosctl", "--admin-url", "http://127.0.0.1:9", "preset", "list"];
    let cli = Cli::try_parse_from(argv).expect("valid arguments");
    commands::run(cli).await.expect("list works offline");
}

#[tokio::test]
async fn test_watch_rejects_interval_below_minimum() {
    let server = engine_with(json!({}), 200).await;

    let err = commands::run(cli(&server, &["watch", "--interval-ms", "10"]))
        .await
        .expect_err("10ms is below the minimum");
    assert!(format!("{err:#}").contains("poll_interval_ms"));
    assert!(server.received_requests().await.expect("recording enabled").is_empty());
}
