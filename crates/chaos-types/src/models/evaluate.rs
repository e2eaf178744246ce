//! Rule semantics enforced by the engine.
//!
//! The engine applies these when it proxies a request; the client uses the
//! same functions to preview what a configuration will do to a given path.

use rand::Rng;
use serde::Serialize;
use std::fmt;

use super::config::{FailureMode, MockRule, ProxyConfiguration, StatusRule};

/// Prefix match used by chaos routes and both rule kinds. An empty pattern
/// matches every path.
pub fn matches_path(pattern: &str, path: &str) -> bool {
    path.starts_with(pattern)
}

/// Whether latency, throttling and faults apply to `path`.
pub fn is_chaos_route(routes: &[String], path: &str) -> bool {
    routes.iter().any(|route| matches_path(route, path))
}

/// Does a matching status rule fire for a roll in `[0, 100)`?
fn triggers(rule: &StatusRule, roll: u8) -> bool {
    rule.error_rate > 0 && roll < rule.error_rate
}

/// Walk status rules in list order and return the first one that matches
/// `path` and whose probability roll succeeds. Each matching rule gets its
/// own roll.
pub fn select_status_rule<'a, R: Rng + ?Sized>(
    rules: &'a [StatusRule],
    path: &str,
    rng: &mut R,
) -> Option<&'a StatusRule> {
    rules
        .iter()
        .filter(|rule| matches_path(&rule.path_pattern, path))
        .find(|rule| triggers(rule, rng.gen_range(0..100)))
}

/// First active mock rule matching `path`.
pub fn select_mock_rule<'a>(rules: &'a [MockRule], path: &str) -> Option<&'a MockRule> {
    rules.iter().find(|rule| rule.active && matches_path(&rule.path_pattern, path))
}

/// Annotation the engine attaches to a tampered traffic log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TamperKind {
    /// A status rule replaced the response
    Injected(u16),
    /// A connection fault is active
    Failure(FailureMode),
    /// Delays and header tampering together
    LagAndHeaders,
    /// Header tampering only
    Headers,
    /// Added latency, total of both delays in ms
    Lag(u64),
}

impl fmt::Display for TamperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Injected(code) => write!(f, "INJECT {}", code),
            Self::Failure(mode) => write!(f, "{}", mode),
            Self::LagAndHeaders => f.write_str("LAG + HEADERS"),
            Self::Headers => f.write_str("HEADER HAX"),
            Self::Lag(ms) => write!(f, "LAG +{}ms", ms),
        }
    }
}

/// Annotation for a request that was proxied (or injected) under `config`.
pub fn tamper_annotation(config: &ProxyConfiguration, injected: Option<u16>) -> Option<TamperKind> {
    if let Some(code) = injected {
        return Some(TamperKind::Injected(code));
    }
    if !config.failure_mode.is_normal() {
        return Some(TamperKind::Failure(config.failure_mode));
    }
    let headers = !config.header_rules.is_clean();
    let lag = config.throttle.total_delay_ms();
    match (headers, lag > 0) {
        (true, true) => Some(TamperKind::LagAndHeaders),
        (true, false) => Some(TamperKind::Headers),
        (false, true) => Some(TamperKind::Lag(lag)),
        (false, false) => None,
    }
}

/// A status rule that matches a path, with the chance that it is the one
/// that fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCandidate {
    pub rule: StatusRule,
    /// Probability in [0, 1] that this rule wins, given earlier rules
    pub win_probability: f64,
}

/// What a configuration does to requests for one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPreview {
    pub path: String,
    pub chaos_route: bool,
    /// Origin the request is forwarded to
    pub target: String,
    pub status_candidates: Vec<StatusCandidate>,
    /// Probability that no status rule fires
    pub passthrough_probability: f64,
    pub mock: Option<MockRule>,
    /// Annotation when no status rule fires
    pub annotation: Option<TamperKind>,
}

/// Preview the rules that apply to `path`.
pub fn preview(config: &ProxyConfiguration, path: &str) -> RequestPreview {
    let chaos_route = is_chaos_route(&config.chaos_routes, path);

    let mut remaining = 1.0_f64;
    let mut status_candidates = Vec::new();
    for rule in config.status_rules.iter().filter(|r| matches_path(&r.path_pattern, path)) {
        let p = f64::from(rule.error_rate) / 100.0;
        status_candidates.push(StatusCandidate { rule: rule.clone(), win_probability: remaining * p });
        remaining *= 1.0 - p;
    }

    RequestPreview {
        path: path.to_string(),
        chaos_route,
        target: config.target_for(chaos_route).to_string(),
        status_candidates,
        passthrough_probability: remaining,
        mock: select_mock_rule(&config.mock_rules, path).cloned(),
        annotation: tamper_annotation(config, None),
    }
}
