use super::*;
use serde_json::json;
use std::time::Duration;

fn loaded(raw: Value) -> EditorState {
    let mut editor = EditorState::new();
    let ticket = editor.begin_pull();
    assert!(editor.finish_pull(ticket, PullOutcome::Loaded(raw)));
    editor
}

#[test]
fn test_initial_state() {
    let editor = EditorState::new();
    let now = Instant::now();
    assert_eq!(editor.status_text(now), "Connecting...");
    assert_eq!(editor.preset(), "unlimited");
    assert!(!editor.can_apply());
}

#[test]
fn test_pull_edit_push_scenario() {
    let t0 = Instant::now();
    let mut editor = loaded(json!({"Mode": "split", "LagToReq": 0}));
    assert_eq!(editor.status_text(t0), "Ready");
    assert_eq!(editor.preset(), "unlimited");
    assert!(!editor.can_apply());

    editor.set_field("LagToReq", "150").unwrap();
    assert_eq!(editor.preset(), CUSTOM_PRESET_ID);
    assert!(editor.can_apply());
    assert_eq!(editor.status_text(t0), "Unsaved");

    let ticket = editor.begin_push();
    assert_eq!(editor.status_text(t0), "Syncing...");
    assert!(!editor.can_apply());

    let body = serde_json::to_value(ticket.payload()).unwrap();
    assert_eq!(body["lagToReq"], json!(150));
    assert_eq!(body["mode"], json!("split"));
    assert_eq!(body["chaosRoutes"], json!(["/api", "/graphql"]));

    assert!(editor.finish_push(&ticket, PushOutcome::Accepted, t0));
    assert_eq!(editor.status_text(t0 + Duration::from_millis(1999)), "Active");
    assert_eq!(editor.status_text(t0 + SAVED_CONFIRMATION), "Ready");
    assert!(!editor.is_dirty());
    assert!(!editor.can_apply());
}

#[test]
fn test_pull_failures() {
    let mut editor = EditorState::new();
    let ticket = editor.begin_pull();
    editor.finish_pull(ticket, PullOutcome::ServerError { status: 500 });
    assert_eq!(editor.status_text(Instant::now()), "Server Error");

    let ticket = editor.begin_pull();
    editor.finish_pull(ticket, PullOutcome::Offline);
    assert_eq!(editor.status_text(Instant::now()), "Offline (Is the engine running?)");
    assert_eq!(editor.snapshot(), ProxyConfiguration::default());
}

#[test]
fn test_pull_classifies_preset_on_load() {
    let editor = loaded(json!({
        "requestDelayMs": 50, "responseDelayMs": 80,
        "bandwidthUpBps": 750, "bandwidthDownBps": 2000, "jitterMs": 30,
        "failureMode": "normal"
    }));
    assert_eq!(editor.preset(), "fast4g");
    assert!(!editor.is_dirty());
}

#[test]
fn test_throttle_edit_never_snaps_to_preset() {
    let mut editor = loaded(json!({"lagToReq": 50, "lagToResp": 80, "bandwidthUp": 750, "bandwidthDown": 2000, "jitter": 31}));
    assert_eq!(editor.preset(), CUSTOM_PRESET_ID);
    editor.set_throttle(ThrottleField::Jitter, 30);
    assert_eq!(editor.preset(), CUSTOM_PRESET_ID);
}

#[test]
fn test_apply_preset() {
    let mut editor = loaded(json!({}));
    editor.apply_preset("3g").unwrap();
    assert_eq!(editor.preset(), "3g");
    assert_eq!(editor.config().throttle.request_delay_ms, 300);
    assert!(editor.is_dirty());
    assert!(matches!(editor.apply_preset("5g"), Err(ConfigError::UnknownPreset { .. })));
}

#[test]
fn test_failed_push_keeps_edits() {
    let now = Instant::now();
    let mut editor = loaded(json!({}));
    editor.set_failure_mode(FailureMode::Timeout);

    let ticket = editor.begin_push();
    editor.finish_push(&ticket, PushOutcome::Rejected { status: 400 }, now);
    assert_eq!(editor.status_text(now), "Error");
    assert!(editor.is_dirty());
    assert!(editor.can_apply());

    let ticket = editor.begin_push();
    editor.finish_push(&ticket, PushOutcome::Unreachable, now);
    assert_eq!(editor.status_text(now), "Connection Failed");
    assert_eq!(editor.config().failure_mode, FailureMode::Timeout);
}

#[test]
fn test_edit_during_sync_stays_dirty() {
    let now = Instant::now();
    let mut editor = loaded(json!({}));
    editor.set_mode(ProxyMode::Unified);
    let ticket = editor.begin_push();

    editor.set_chaos_routes("/api, /v2");
    assert_eq!(editor.status_text(now), "Syncing...");

    editor.finish_push(&ticket, PushOutcome::Accepted, now);
    assert!(editor.is_dirty());
    assert_eq!(editor.status_text(now), "Unsaved");
    assert!(editor.can_apply());
}

#[test]
fn test_stale_push_result_is_discarded() {
    let now = Instant::now();
    let mut editor = loaded(json!({}));
    editor.set_header_flag(HeaderFlag::StripCors, true);
    let first = editor.begin_push();
    let second = editor.begin_push();

    assert!(!editor.finish_push(&first, PushOutcome::Unreachable, now));
    assert_eq!(editor.edit_state(), EditState::Syncing);
    assert!(editor.finish_push(&second, PushOutcome::Accepted, now));
    assert!(!editor.is_dirty());
}

#[test]
fn test_pull_after_push_started_is_discarded() {
    let mut editor = EditorState::new();
    let pull = editor.begin_pull();
    editor.set_throttle(ThrottleField::RequestDelay, 10);
    let _push = editor.begin_push();

    assert!(!editor.finish_pull(pull, PullOutcome::Loaded(json!({"lagToReq": 999}))));
    assert_eq!(editor.config().throttle.request_delay_ms, 10);
}

#[test]
fn test_superseded_pull_is_discarded() {
    let mut editor = loaded(json!({"lagToReq": 5}));
    let first = editor.begin_pull();
    let second = editor.begin_pull();

    assert!(!editor.finish_pull(first, PullOutcome::Loaded(json!({"lagToReq": 999, "mode": "unified"}))));
    assert_eq!(editor.config().throttle.request_delay_ms, 5);
    assert_eq!(editor.config().mode, ProxyMode::Split);
    assert_eq!(editor.connection(), ConnectionState::Connecting);
    assert!(!editor.is_dirty());

    assert!(editor.finish_pull(second, PullOutcome::Loaded(json!({"lagToReq": 7}))));
    assert_eq!(editor.config().throttle.request_delay_ms, 7);
    assert_eq!(editor.connection(), ConnectionState::Ready);
}

#[test]
fn test_oversized_throttle_input_fits_engine_integers() {
    let mut editor = loaded(json!({}));
    editor.set_field("lagToReq", "1e30").unwrap();
    editor.set_throttle(ThrottleField::Jitter, u64::MAX);

    let ticket = editor.begin_push();
    let body = serde_json::to_value(ticket.payload()).unwrap();
    assert_eq!(body["lagToReq"], json!(i64::MAX));
    assert_eq!(body["jitter"], json!(i64::MAX));
}

#[test]
fn test_noop_edit_does_not_dirty() {
    let mut editor = loaded(json!({"mode": "unified"}));
    editor.set_mode(ProxyMode::Unified);
    editor.reset_headers();
    assert!(!editor.remove_status_rule("missing"));
    assert!(!editor.is_dirty());
    assert_eq!(editor.status_text(Instant::now()), "Ready");
}

#[test]
fn test_rule_crud_through_editor() {
    let mut editor = loaded(json!({}));
    let a = editor.add_status_rule();
    let b = editor.add_status_rule();
    assert_ne!(a, b);

    assert!(editor.update_status_rule(&a, StatusRulePatch::error_rate(150)));
    assert_eq!(editor.status_rule(&a).unwrap().error_rate, 100);
    assert!(editor.remove_status_rule(&a));
    assert_eq!(editor.config().status_rules.as_slice()[0].id, b);

    let m = editor.add_mock_rule();
    assert!(editor.update_mock_rule(&m, MockRulePatch::Active(false)));
    assert!(!editor.mock_rule(&m).unwrap().active);
}

#[test]
fn test_set_field_keys() {
    let mut editor = loaded(json!({}));
    editor.set_field("targetBackend", " http://api.local:8080 ").unwrap();
    editor.set_field("stripCache", "true").unwrap();
    editor.set_field("bandwidthDownBps", "abc").unwrap();
    assert_eq!(editor.config().target_backend, "http://api.local:8080");
    assert!(editor.config().header_rules.strip_cache);
    assert_eq!(editor.config().throttle.bandwidth_down_bps, 0);

    assert!(matches!(editor.set_field("mode", "mesh"), Err(ConfigError::InvalidValue { .. })));
    assert!(matches!(editor.set_field("colour", "red"), Err(ConfigError::UnknownField { .. })));
}

#[test]
fn test_import_overlays_document() {
    let mut editor = loaded(json!({"targetUnified": "http://legacy:80"}));
    editor.import(&json!({"mode": "unified", "jitter": 20}));
    let config = editor.snapshot();
    assert_eq!(config.mode, ProxyMode::Unified);
    assert_eq!(config.target_unified, "http://legacy:80");
    assert_eq!(editor.preset(), CUSTOM_PRESET_ID);
    assert!(editor.is_dirty());
}
