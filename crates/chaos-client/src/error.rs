//! Error types for the chaos admin client.

use thiserror::Error;

/// Errors that can occur when talking to the engine's admin API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to establish a connection to the engine.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// HTTP request failed.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Engine returned a body that could not be parsed.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Engine returned a non-2xx status.
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Client configuration failed validation.
    #[error("Invalid client config: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Transport-class failures: the engine is unreachable or its answer
    /// could not be read. A non-2xx status is not one of these.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Request(_) | Self::InvalidResponse(_))
    }

    /// HTTP status for server-side rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(e.to_string())
    }
}
