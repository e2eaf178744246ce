//! Chaos configuration in wire form and edit form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::text_of;
use super::enums::{FailureMode, ProxyMode};
use super::lookup::field;
use super::routes::{join_routes, routes_from_value, split_routes};
use super::rules::{HeaderRules, MockRule, StatusRule};
use super::throttle::Throttle;
use crate::models::rule_list::{Rule, RuleList};

pub const DEFAULT_TARGET_FRONTEND: &str = "http://localhost:3000";
pub const DEFAULT_TARGET_BACKEND: &str = "http://localhost:4000";
pub const DEFAULT_TARGET_UNIFIED: &str = "http://localhost:80";
pub const DEFAULT_CHAOS_ROUTES: [&str; 2] = ["/api", "/graphql"];

/// Authoritative configuration as exchanged with the engine's admin API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfiguration {
    pub mode: ProxyMode,
    /// Frontend origin (split mode)
    #[serde(rename = "targetFrontend")]
    pub target_frontend: String,
    /// Backend origin (split mode)
    #[serde(rename = "targetBackend")]
    pub target_backend: String,
    /// Single origin (unified mode)
    #[serde(rename = "targetUnified")]
    pub target_unified: String,
    /// Path prefixes chaos applies to; order is irrelevant
    #[serde(rename = "chaosRoutes")]
    pub chaos_routes: Vec<String>,
    #[serde(flatten)]
    pub throttle: Throttle,
    #[serde(rename = "failureMode")]
    pub failure_mode: FailureMode,
    #[serde(rename = "headerRules")]
    pub header_rules: HeaderRules,
    /// Evaluated in order, first triggered rule wins
    #[serde(rename = "statusRules")]
    pub status_rules: Vec<StatusRule>,
    #[serde(rename = "mockRules")]
    pub mock_rules: Vec<MockRule>,
}

impl Default for ProxyConfiguration {
    fn default() -> Self {
        Self {
            mode: ProxyMode::default(),
            target_frontend: DEFAULT_TARGET_FRONTEND.to_string(),
            target_backend: DEFAULT_TARGET_BACKEND.to_string(),
            target_unified: DEFAULT_TARGET_UNIFIED.to_string(),
            chaos_routes: DEFAULT_CHAOS_ROUTES.iter().map(|r| (*r).to_string()).collect(),
            throttle: Throttle::default(),
            failure_mode: FailureMode::default(),
            header_rules: HeaderRules::default(),
            status_rules: Vec::new(),
            mock_rules: Vec::new(),
        }
    }
}

impl ProxyConfiguration {
    /// Overwrite every field present in `raw`; absent or `null` fields keep
    /// their current value. Never fails: unknown fields are ignored and
    /// malformed values coerce.
    pub fn merge_from(&mut self, raw: &Value) {
        if let Some(mode) = field(raw, &["mode"]).and_then(Value::as_str).and_then(ProxyMode::from_id)
        {
            self.mode = mode;
        }
        if let Some(v) = field(raw, &["targetFrontend"]).and_then(text_of) {
            self.target_frontend = v;
        }
        if let Some(v) = field(raw, &["targetBackend"]).and_then(text_of) {
            self.target_backend = v;
        }
        if let Some(v) = field(raw, &["targetUnified"]).and_then(text_of) {
            self.target_unified = v;
        }
        if let Some(routes) = field(raw, &["chaosRoutes"]).and_then(routes_from_value) {
            self.chaos_routes = routes;
        }

        self.throttle.merge_from(raw);

        if let Some(s) = field(raw, &["failureMode"]).and_then(Value::as_str) {
            self.failure_mode = FailureMode::from_id(s).unwrap_or_else(|| {
                tracing::warn!("Unknown failure mode {:?}, treating as normal", s);
                FailureMode::Normal
            });
        }
        if let Some(v) = field(raw, &["headerRules"]) {
            self.header_rules.merge_from(v);
        }
        if let Some(items) = field(raw, &["statusRules"]).and_then(Value::as_array) {
            self.status_rules = rules_from_values(items);
        }
        if let Some(items) = field(raw, &["mockRules"]).and_then(Value::as_array) {
            self.mock_rules = rules_from_values(items);
        }
    }

    /// Origin that receives a request in the current mode.
    pub fn target_for(&self, backend_route: bool) -> &str {
        match self.mode {
            ProxyMode::Unified => &self.target_unified,
            ProxyMode::Split if backend_route => &self.target_backend,
            ProxyMode::Split => &self.target_frontend,
        }
    }
}

/// Parse rule objects, dropping non-objects and giving fresh ids to rules
/// whose id is missing or repeated.
fn rules_from_values<R: Rule>(items: &[Value]) -> Vec<R> {
    RuleList::from_rules(items.iter().filter_map(R::from_value).collect()).into_vec()
}

/// Build a full configuration from loosely typed input, filling every
/// missing field from the defaults.
pub fn normalize(raw: &Value) -> ProxyConfiguration {
    let mut config = ProxyConfiguration::default();
    config.merge_from(raw);
    config
}

/// Configuration as held by the editor: routes are a comma-joined string and
/// rule lists keep their own id bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfigState {
    pub mode: ProxyMode,
    pub target_frontend: String,
    pub target_backend: String,
    pub target_unified: String,
    pub chaos_routes: String,
    pub throttle: Throttle,
    pub failure_mode: FailureMode,
    pub header_rules: HeaderRules,
    pub status_rules: RuleList<StatusRule>,
    pub mock_rules: RuleList<MockRule>,
}

impl Default for ProxyConfigState {
    fn default() -> Self {
        Self::from(ProxyConfiguration::default())
    }
}

impl From<ProxyConfiguration> for ProxyConfigState {
    fn from(config: ProxyConfiguration) -> Self {
        Self {
            mode: config.mode,
            target_frontend: config.target_frontend,
            target_backend: config.target_backend,
            target_unified: config.target_unified,
            chaos_routes: join_routes(&config.chaos_routes),
            throttle: config.throttle,
            failure_mode: config.failure_mode,
            header_rules: config.header_rules,
            status_rules: RuleList::from_rules(config.status_rules),
            mock_rules: RuleList::from_rules(config.mock_rules),
        }
    }
}

/// Convert the edit form into the full wire configuration.
///
/// The route string is split on commas, trimmed, stripped of empty entries
/// and deduplicated. Numeric fields are already coerced on entry.
pub fn serialize(state: &ProxyConfigState) -> ProxyConfiguration {
    ProxyConfiguration {
        mode: state.mode,
        target_frontend: state.target_frontend.clone(),
        target_backend: state.target_backend.clone(),
        target_unified: state.target_unified.clone(),
        chaos_routes: split_routes(&state.chaos_routes),
        throttle: state.throttle,
        failure_mode: state.failure_mode,
        header_rules: state.header_rules,
        status_rules: state.status_rules.as_slice().to_vec(),
        mock_rules: state.mock_rules.as_slice().to_vec(),
    }
}
