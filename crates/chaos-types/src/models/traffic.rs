//! Traffic feed entries reported by the engine.

use serde::{Deserialize, Serialize};

/// One proxied request, as recorded by the engine. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrafficLog {
    pub id: i64,
    pub method: String,
    pub path: String,
    /// Response status; 0 while the request is still in flight
    pub status: u16,
    /// Duration in milliseconds
    pub duration: u64,
    /// Whether the engine altered this request or its response
    pub tampered: bool,
    #[serde(rename = "tamperType", default, skip_serializing_if = "Option::is_none")]
    pub tamper_type: Option<String>,
    /// Wall clock time of the request, formatted by the engine
    pub timestamp: String,
}

impl TrafficLog {
    pub fn is_pending(&self) -> bool {
        self.status == 0
    }

    /// Pending and >= 400 responses render as failures.
    pub fn is_error(&self) -> bool {
        self.is_pending() || self.status >= 400
    }

    /// Display text for the status column.
    pub fn status_label(&self) -> String {
        if self.is_pending() {
            "PENDING".to_string()
        } else {
            self.status.to_string()
        }
    }

    /// What was tampered, if anything. Tampered entries without a type read
    /// as `TAMPERED`.
    pub fn tamper_label(&self) -> Option<&str> {
        if !self.tampered {
            return None;
        }
        Some(self.tamper_type.as_deref().filter(|t| !t.is_empty()).unwrap_or("TAMPERED"))
    }
}
