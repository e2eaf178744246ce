//! Editor state store.
//!
//! `EditorState` owns the editable configuration together with the dirty
//! flag, the connection and edit states and the preset label. It performs no
//! I/O: a driver calls `begin_pull`/`begin_push`, runs the request, then
//! hands the outcome back with `finish_pull`/`finish_push`. Tickets carry
//! sequence numbers so late results never overwrite newer state.

mod status;

pub use status::{
    ConnectionState, EditState, PullOutcome, PullTicket, PushFailure, PushOutcome, PushTicket,
    SAVED_CONFIRMATION,
};

use serde_json::Value;
use std::time::Instant;

use super::config::coerce::{coerce_u64_str, flag_of_str};
use super::config::{
    serialize, FailureMode, HeaderFlag, HeaderRules, MockRule, MockRulePatch, ProxyConfigState,
    ProxyConfiguration, ProxyMode, StatusRule, StatusRulePatch, ThrottleField,
};
use super::preset::{classify, find_preset, CUSTOM_PRESET_ID};
use super::rule_list::Rule;
use crate::error::{ConfigError, Result};

/// One of the three origin URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginTarget {
    Frontend,
    Backend,
    Unified,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    config: ProxyConfigState,
    preset: &'static str,
    dirty: bool,
    connection: ConnectionState,
    edit: EditState,
    pull_seq: u64,
    push_seq: u64,
    /// Bumped on every effective edit
    edit_seq: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        let config = ProxyConfigState::default();
        let preset = classify(&config.throttle, config.failure_mode);
        Self {
            config,
            preset,
            dirty: false,
            connection: ConnectionState::Connecting,
            edit: EditState::Saved { confirmed_at: None },
            pull_seq: 0,
            push_seq: 0,
            edit_seq: 0,
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ProxyConfigState {
        &self.config
    }

    /// Complete wire configuration for the current edit form.
    pub fn snapshot(&self) -> ProxyConfiguration {
        serialize(&self.config)
    }

    pub fn preset(&self) -> &'static str {
        self.preset
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn edit_state(&self) -> EditState {
        self.edit
    }

    pub fn is_syncing(&self) -> bool {
        self.edit == EditState::Syncing
    }

    /// Apply is offered while there are unpushed edits and no push is in
    /// flight.
    pub fn can_apply(&self) -> bool {
        self.dirty && !self.is_syncing()
    }

    /// Status indicator text at `now`.
    pub fn status_text(&self, now: Instant) -> &'static str {
        match self.edit {
            EditState::Syncing => return "Syncing...",
            EditState::Unsaved => return "Unsaved",
            EditState::Error(PushFailure::Rejected { .. }) => return "Error",
            EditState::Error(PushFailure::Unreachable) => return "Connection Failed",
            EditState::Saved { confirmed_at: Some(at) }
                if now.saturating_duration_since(at) < SAVED_CONFIRMATION =>
            {
                return "Active";
            },
            EditState::Saved { .. } => {},
        }
        match self.connection {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Ready => "Ready",
            ConnectionState::ServerError { .. } => "Server Error",
            ConnectionState::Offline => "Offline (Is the engine running?)",
        }
    }

    // ---- sync protocol ----

    pub fn begin_pull(&mut self) -> PullTicket {
        self.pull_seq += 1;
        self.connection = ConnectionState::Connecting;
        PullTicket { seq: self.pull_seq, push_seq_at_start: self.push_seq }
    }

    /// Apply a pull result. Returns false when the result was discarded
    /// because a newer pull or any push started after it.
    pub fn finish_pull(&mut self, ticket: PullTicket, outcome: PullOutcome) -> bool {
        if ticket.seq != self.pull_seq || ticket.push_seq_at_start != self.push_seq {
            tracing::debug!("Discarding stale pull result (ticket {})", ticket.seq);
            return false;
        }
        match outcome {
            PullOutcome::Loaded(raw) => {
                let mut merged = self.snapshot();
                merged.merge_from(&raw);
                self.load(merged);
                self.connection = ConnectionState::Ready;
            },
            PullOutcome::ServerError { status } => {
                self.connection = ConnectionState::ServerError { status };
            },
            PullOutcome::Offline => self.connection = ConnectionState::Offline,
        }
        true
    }

    /// Replace the edit form with `config` and classify its throttle values.
    /// The dirty flag is left alone.
    pub fn load(&mut self, config: ProxyConfiguration) {
        self.preset = classify(&config.throttle, config.failure_mode);
        self.config = ProxyConfigState::from(config);
    }

    pub fn begin_push(&mut self) -> PushTicket {
        self.push_seq += 1;
        self.edit = EditState::Syncing;
        PushTicket {
            seq: self.push_seq,
            edit_seq_at_start: self.edit_seq,
            payload: self.snapshot(),
        }
    }

    /// Apply a push result. Returns false when the result belongs to a push
    /// that has since been superseded.
    pub fn finish_push(&mut self, ticket: &PushTicket, outcome: PushOutcome, now: Instant) -> bool {
        if ticket.seq != self.push_seq {
            tracing::debug!("Discarding stale push result (ticket {})", ticket.seq);
            return false;
        }
        match outcome {
            PushOutcome::Accepted => {
                self.connection = ConnectionState::Ready;
                if self.edit_seq == ticket.edit_seq_at_start {
                    self.dirty = false;
                    self.edit = EditState::Saved { confirmed_at: Some(now) };
                } else {
                    self.edit = EditState::Unsaved;
                }
            },
            PushOutcome::Rejected { status } => {
                self.edit = EditState::Error(PushFailure::Rejected { status });
            },
            PushOutcome::Unreachable => {
                self.edit = EditState::Error(PushFailure::Unreachable);
            },
        }
        true
    }

    // ---- edits ----

    /// Run `f` against the edit form and mark the editor dirty if anything
    /// changed.
    fn edit<T>(&mut self, f: impl FnOnce(&mut ProxyConfigState) -> T) -> T {
        let before = self.config.clone();
        let out = f(&mut self.config);
        if self.config != before {
            self.dirty = true;
            self.edit_seq += 1;
            if !self.is_syncing() {
                self.edit = EditState::Unsaved;
            }
        }
        out
    }

    pub fn set_mode(&mut self, mode: ProxyMode) {
        self.edit(|c| c.mode = mode);
    }

    pub fn set_target(&mut self, target: OriginTarget, url: &str) {
        let url = url.trim().to_string();
        self.edit(|c| match target {
            OriginTarget::Frontend => c.target_frontend = url,
            OriginTarget::Backend => c.target_backend = url,
            OriginTarget::Unified => c.target_unified = url,
        });
    }

    /// Set the comma-separated route string as typed.
    pub fn set_chaos_routes(&mut self, routes: &str) {
        let routes = routes.to_string();
        self.edit(|c| c.chaos_routes = routes);
    }

    /// Manual throttle edit. The preset label becomes `custom`.
    pub fn set_throttle(&mut self, field: ThrottleField, value: u64) {
        self.preset = CUSTOM_PRESET_ID;
        self.edit(|c| c.throttle.set(field, value));
    }

    /// Copy a preset's five throttle values and label the editor with it.
    pub fn apply_preset(&mut self, id: &str) -> Result<()> {
        let preset = find_preset(id)?;
        self.preset = preset.id;
        self.edit(|c| c.throttle = preset.throttle);
        Ok(())
    }

    pub fn set_failure_mode(&mut self, mode: FailureMode) {
        self.edit(|c| c.failure_mode = mode);
    }

    pub fn set_header_flag(&mut self, flag: HeaderFlag, on: bool) {
        self.edit(|c| c.header_rules.set(flag, on));
    }

    /// Turn every header flag off.
    pub fn reset_headers(&mut self) {
        self.edit(|c| c.header_rules = HeaderRules::default());
    }

    /// Append a status rule with defaults; returns its id.
    pub fn add_status_rule(&mut self) -> String {
        self.edit(|c| c.status_rules.add().id().to_string())
    }

    pub fn update_status_rule(&mut self, id: &str, patch: StatusRulePatch) -> bool {
        self.edit(|c| c.status_rules.update(id, patch))
    }

    pub fn remove_status_rule(&mut self, id: &str) -> bool {
        self.edit(|c| c.status_rules.remove(id))
    }

    pub fn status_rule(&self, id: &str) -> Option<&StatusRule> {
        self.config.status_rules.get(id)
    }

    /// Append a mock rule with defaults; returns its id.
    pub fn add_mock_rule(&mut self) -> String {
        self.edit(|c| c.mock_rules.add().id().to_string())
    }

    pub fn update_mock_rule(&mut self, id: &str, patch: MockRulePatch) -> bool {
        self.edit(|c| c.mock_rules.update(id, patch))
    }

    pub fn remove_mock_rule(&mut self, id: &str) -> bool {
        self.edit(|c| c.mock_rules.remove(id))
    }

    pub fn mock_rule(&self, id: &str) -> Option<&MockRule> {
        self.config.mock_rules.get(id)
    }

    /// Set a scalar field from raw form input. Keys are matched
    /// case-insensitively and accept the descriptive throttle aliases.
    /// Numbers and flags coerce permissively; enumerated fields must name a
    /// known value.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<()> {
        if let Some(field) = ThrottleField::from_key(key) {
            self.set_throttle(field, coerce_u64_str(raw));
            return Ok(());
        }
        if let Some(flag) = HeaderFlag::from_key(key) {
            self.set_header_flag(flag, flag_of_str(raw));
            return Ok(());
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "mode" => {
                let mode = ProxyMode::from_id(raw).ok_or_else(|| invalid("mode", raw))?;
                self.set_mode(mode);
            },
            "failuremode" => {
                let mode = FailureMode::from_id(raw).ok_or_else(|| invalid("failureMode", raw))?;
                self.set_failure_mode(mode);
            },
            "targetfrontend" => self.set_target(OriginTarget::Frontend, raw),
            "targetbackend" => self.set_target(OriginTarget::Backend, raw),
            "targetunified" => self.set_target(OriginTarget::Unified, raw),
            "chaosroutes" | "routes" => self.set_chaos_routes(raw),
            _ => return Err(ConfigError::UnknownField { field: key.to_string() }),
        }
        Ok(())
    }

    /// Overlay a loosely typed document onto the edit form, as one edit.
    /// A change to any throttle value labels the editor `custom`.
    pub fn import(&mut self, raw: &Value) {
        let mut merged = self.snapshot();
        merged.merge_from(raw);
        if merged.throttle != self.config.throttle {
            self.preset = CUSTOM_PRESET_ID;
        }
        self.edit(|c| *c = ProxyConfigState::from(merged));
    }
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue { field: field.to_string(), value: value.to_string() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
