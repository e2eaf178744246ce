use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_ADMIN_ORIGIN: &str = "http://localhost:9000";
pub const ENV_ADMIN_URL: &str = "CHAOS_ADMIN_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHAOS_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "CHAOS_POLL_INTERVAL_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ClientConfig {
    /// Origin serving `/api/config` and `/api/activity`
    #[validate(url)]
    pub admin_origin: String,
    /// Per-request timeout
    #[validate(range(min = 1_u64, max = 300_u64))]
    pub timeout_secs: u64,
    /// Traffic feed refresh interval
    #[validate(range(min = 50_u64, max = 60_000_u64))]
    pub poll_interval_ms: u64,
    /// Keep at most this many feed entries; `None` keeps what the engine sends
    #[serde(default)]
    pub max_feed_entries: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            admin_origin: DEFAULT_ADMIN_ORIGIN.to_string(),
            timeout_secs: 10,
            poll_interval_ms: 1000,
            max_feed_entries: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `CHAOS_ADMIN_URL`, `CHAOS_TIMEOUT_SECS` and
    /// `CHAOS_POLL_INTERVAL_MS`. Numbers that do not parse or fall outside
    /// the validated range are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_ADMIN_URL).filter(|u| !u.trim().is_empty()) {
            config.admin_origin = url.trim().to_string();
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|s| s.trim().parse().ok()) {
            let candidate = Self { timeout_secs: secs, ..config.clone() };
            if candidate.field_is_valid("timeout_secs") {
                config = candidate;
            } else {
                tracing::warn!("Ignoring {}={}: out of range", ENV_TIMEOUT_SECS, secs);
            }
        }
        if let Some(ms) = lookup(ENV_POLL_INTERVAL_MS).and_then(|s| s.trim().parse().ok()) {
            let candidate = Self { poll_interval_ms: ms, ..config.clone() };
            if candidate.field_is_valid("poll_interval_ms") {
                config = candidate;
            } else {
                tracing::warn!("Ignoring {}={}: out of range", ENV_POLL_INTERVAL_MS, ms);
            }
        }
        config
    }

    fn field_is_valid(&self, field: &str) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(errors) => !errors.field_errors().contains_key(field),
        }
    }

    /// Admin origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.admin_origin.trim_end_matches('/')
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.admin_origin = origin.into();
        self
    }
}
