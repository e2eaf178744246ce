//! Header tampering flags and the two per-path rule kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{coerce_u64, coerce_u64_str, flag_of, flag_of_str, text_of, to_percent, to_u16};
use super::lookup::field;
use crate::error::{ConfigError, Result};
use crate::models::rule_list::Rule;

/// Response header tampering. Flags are independent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HeaderRules {
    /// Remove Access-Control-* headers
    #[serde(rename = "stripCORS")]
    pub strip_cors: bool,
    /// Remove validators and force no-store
    #[serde(rename = "stripCache")]
    pub strip_cache: bool,
    /// Replace the content type with text/plain or garbage
    #[serde(rename = "corruptContentType")]
    pub corrupt_content_type: bool,
}

/// One of the three header tampering flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFlag {
    StripCors,
    StripCache,
    CorruptContentType,
}

impl HeaderFlag {
    pub const ALL: [Self; 3] = [Self::StripCors, Self::StripCache, Self::CorruptContentType];

    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::StripCors => "stripCORS",
            Self::StripCache => "stripCache",
            Self::CorruptContentType => "corruptContentType",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.wire_key().eq_ignore_ascii_case(key.trim()))
    }
}

impl HeaderRules {
    /// True when no flag is set and headers pass through unmodified.
    pub const fn is_clean(&self) -> bool {
        !self.strip_cors && !self.strip_cache && !self.corrupt_content_type
    }

    pub const fn get(&self, flag: HeaderFlag) -> bool {
        match flag {
            HeaderFlag::StripCors => self.strip_cors,
            HeaderFlag::StripCache => self.strip_cache,
            HeaderFlag::CorruptContentType => self.corrupt_content_type,
        }
    }

    pub fn set(&mut self, flag: HeaderFlag, on: bool) {
        match flag {
            HeaderFlag::StripCors => self.strip_cors = on,
            HeaderFlag::StripCache => self.strip_cache = on,
            HeaderFlag::CorruptContentType => self.corrupt_content_type = on,
        }
    }

    /// Overwrite flags present in `raw`, keep the others.
    pub(crate) fn merge_from(&mut self, raw: &Value) {
        for flag in HeaderFlag::ALL {
            if let Some(v) = field(raw, &[flag.wire_key()]) {
                self.set(flag, flag_of(v));
            }
        }
    }
}

/// Forces a status code for matching paths with a given probability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusRule {
    pub id: String,
    /// Path prefix; an empty pattern matches every path
    #[serde(rename = "pathPattern")]
    pub path_pattern: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Trigger probability in percent, always within [0, 100]
    #[serde(rename = "errorRate")]
    pub error_rate: u8,
}

pub const DEFAULT_STATUS_CODE: u16 = 500;
pub const DEFAULT_ERROR_RATE: u8 = 100;

/// Single-field edit of a status rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusRulePatch {
    PathPattern(String),
    StatusCode(u16),
    ErrorRate(u8),
}

impl StatusRulePatch {
    /// Error rate edit; values above 100 are clamped.
    pub fn error_rate(rate: u64) -> Self {
        Self::ErrorRate(to_percent(rate))
    }

    /// Build a patch from a field key and raw form input.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "pathpattern" | "path" => Ok(Self::PathPattern(value.to_string())),
            "statuscode" | "code" | "status" => {
                Ok(Self::StatusCode(to_u16(coerce_u64_str(value))))
            },
            "errorrate" | "rate" => Ok(Self::error_rate(coerce_u64_str(value))),
            _ => Err(ConfigError::UnknownRuleField {
                kind: StatusRule::KIND.to_string(),
                field: field.to_string(),
            }),
        }
    }
}

impl Rule for StatusRule {
    const KIND: &'static str = "status";
    type Patch = StatusRulePatch;

    fn with_id(id: String) -> Self {
        Self {
            id,
            path_pattern: String::new(),
            status_code: DEFAULT_STATUS_CODE,
            error_rate: DEFAULT_ERROR_RATE,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: StatusRulePatch) {
        match patch {
            StatusRulePatch::PathPattern(p) => self.path_pattern = p,
            StatusRulePatch::StatusCode(c) => self.status_code = c,
            StatusRulePatch::ErrorRate(r) => self.error_rate = r.min(100),
        }
    }

    fn from_value(raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        let mut rule = Self::with_id(field(raw, &["id"]).and_then(text_of).unwrap_or_default());
        if let Some(v) = field(raw, &["pathPattern"]).and_then(text_of) {
            rule.path_pattern = v;
        }
        if let Some(v) = field(raw, &["statusCode"]) {
            rule.status_code = to_u16(coerce_u64(v));
        }
        if let Some(v) = field(raw, &["errorRate"]) {
            rule.error_rate = to_percent(coerce_u64(v));
        }
        Some(rule)
    }
}

/// Short-circuits matching paths with a canned body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockRule {
    pub id: String,
    #[serde(rename = "pathPattern")]
    pub path_pattern: String,
    /// Returned verbatim
    pub body: String,
    pub active: bool,
}

pub const DEFAULT_MOCK_BODY: &str = "{\n  \"status\": \"ok\",\n  \"data\": []\n}";

/// Single-field edit of a mock rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRulePatch {
    PathPattern(String),
    Body(String),
    Active(bool),
}

impl MockRulePatch {
    /// Build a patch from a field key and raw form input.
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        match field.trim().to_ascii_lowercase().as_str() {
            "pathpattern" | "path" => Ok(Self::PathPattern(value.to_string())),
            "body" => Ok(Self::Body(value.to_string())),
            "active" => Ok(Self::Active(flag_of_str(value))),
            _ => Err(ConfigError::UnknownRuleField {
                kind: MockRule::KIND.to_string(),
                field: field.to_string(),
            }),
        }
    }
}

impl Rule for MockRule {
    const KIND: &'static str = "mock";
    type Patch = MockRulePatch;

    fn with_id(id: String) -> Self {
        Self {
            id,
            path_pattern: String::new(),
            body: DEFAULT_MOCK_BODY.to_string(),
            active: true,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: MockRulePatch) {
        match patch {
            MockRulePatch::PathPattern(p) => self.path_pattern = p,
            MockRulePatch::Body(b) => self.body = b,
            MockRulePatch::Active(a) => self.active = a,
        }
    }

    fn from_value(raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        let mut rule = Self::with_id(field(raw, &["id"]).and_then(text_of).unwrap_or_default());
        if let Some(v) = field(raw, &["pathPattern"]).and_then(text_of) {
            rule.path_pattern = v;
        }
        if let Some(v) = field(raw, &["body"]) {
            rule.body = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
        if let Some(v) = field(raw, &["active"]) {
            rule.active = flag_of(v);
        }
        Some(rule)
    }
}
