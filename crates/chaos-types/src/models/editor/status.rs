//! Connection and edit states, and the tickets that sequence network calls.

use serde_json::Value;
use std::time::{Duration, Instant};

use crate::models::config::ProxyConfiguration;

/// How long a successful push reads as "Active" before reverting.
pub const SAVED_CONFIRMATION: Duration = Duration::from_secs(2);

/// Reachability of the engine, as learned from the startup pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Ready,
    /// Engine answered the pull with a non-2xx status
    ServerError { status: u16 },
    /// Engine could not be reached, or answered with something unreadable
    Offline,
}

/// Why a push failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushFailure {
    Rejected { status: u16 },
    Unreachable,
}

/// Progress of local edits towards the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Local state matches what the engine last accepted. `confirmed_at` is
    /// set when a push has just succeeded.
    Saved { confirmed_at: Option<Instant> },
    Unsaved,
    Syncing,
    Error(PushFailure),
}

/// Result of `GET /api/config` as seen by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum PullOutcome {
    Loaded(Value),
    ServerError { status: u16 },
    Offline,
}

/// Result of `POST /api/config` as seen by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Accepted,
    Rejected { status: u16 },
    Unreachable,
}

/// Handed out by `begin_pull`, returned with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullTicket {
    pub(super) seq: u64,
    pub(super) push_seq_at_start: u64,
}

/// Handed out by `begin_push`; carries the snapshot to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTicket {
    pub(super) seq: u64,
    pub(super) edit_seq_at_start: u64,
    pub(super) payload: ProxyConfiguration,
}

impl PushTicket {
    /// Complete configuration to POST.
    pub fn payload(&self) -> &ProxyConfiguration {
        &self.payload
    }
}
