//! Configuration edit errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while editing a chaos configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Edit key does not name a configuration field
    #[error("Unknown config field: {field}")]
    UnknownField {
        /// Key as supplied by the caller
        field: String,
    },

    /// Edit key does not name a field of the given rule kind
    #[error("Unknown {kind} rule field: {field}")]
    UnknownRuleField {
        /// Rule kind ("status" or "mock")
        kind: String,
        /// Key as supplied by the caller
        field: String,
    },

    /// Value is not one of the accepted choices for an enumerated field
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Field being edited
        field: String,
        /// Rejected input
        value: String,
    },

    /// Preset id is not in the preset table
    #[error("Unknown preset: {id}")]
    UnknownPreset {
        /// Preset id as supplied by the caller
        id: String,
    },

    /// Configuration document is not valid JSON
    #[error("Config parse error: {message}")]
    ParseError {
        /// Description of the parse failure
        message: String,
    },
}

impl ConfigError {
    /// Create a parse error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::ParseError { message: e.to_string() }
    }
}
