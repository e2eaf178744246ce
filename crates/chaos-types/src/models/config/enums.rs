//! Configuration enums for routing mode and connection faults.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the engine routes traffic to origins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    /// Frontend and backend origins are proxied separately
    #[default]
    Split,
    /// A single origin receives all traffic
    Unified,
}

impl ProxyMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Unified => "unified",
        }
    }

    /// Parse a wire id, case-insensitively.
    pub fn from_id(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "split" => Some(Self::Split),
            "unified" => Some(Self::Unified),
            _ => None,
        }
    }
}

impl fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection-level fault injected into proxied responses.
///
/// Mutually exclusive; `Normal` disables all connection faults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// No artificial errors
    #[default]
    Normal,
    /// Response held back long enough to look like a server hang
    Timeout,
    /// Headers sent, body never completes
    HangBody,
    /// Connection dropped mid-body
    CloseBody,
}

impl FailureMode {
    pub const ALL: [Self; 4] = [Self::Normal, Self::Timeout, Self::HangBody, Self::CloseBody];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Timeout => "timeout",
            Self::HangBody => "hang_body",
            Self::CloseBody => "close_body",
        }
    }

    /// Human readable description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "No artificial errors.",
            Self::Timeout => "Simulates a 60s server hang.",
            Self::HangBody => "Headers sent, body hangs forever.",
            Self::CloseBody => "Connection killed mid-stream.",
        }
    }

    /// Parse a wire id. The engine treats an empty mode as normal.
    pub fn from_id(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "normal" => Some(Self::Normal),
            "timeout" => Some(Self::Timeout),
            "hang_body" => Some(Self::HangBody),
            "close_body" => Some(Self::CloseBody),
            _ => None,
        }
    }

    pub const fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
