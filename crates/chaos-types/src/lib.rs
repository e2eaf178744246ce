//! # Chaos Types
//!
//! Configuration model, presets, rule editors and editor state for the
//! chaos proxy control client.
//!
//! - **`error`** - Typed errors for field edits
//! - **`models`** - Wire configuration, edit form, presets, rule lists,
//!   traffic log entries and the editor state store
//!
//! ## Architecture Role
//!
//! `chaos-types` sits at the bottom of the dependency graph and performs no I/O:
//!
//! ```text
//!        chaos-types (this crate)
//!              │
//!              ▼
//!        chaos-client  (admin API, sync, traffic feed)
//!              │
//!              ▼
//!         chaos-cli    (chaosctl, chaos-runner)
//! ```
//!
//! The engine that actually delays, throttles and mocks traffic lives in a
//! separate process; `models::evaluate` mirrors only the rule semantics it
//! enforces so the client can preview their effect.

pub mod error;
pub mod models;

pub use error::{ConfigError, Result};

pub use models::{
    normalize, serialize, EditorState, FailureMode, HeaderRules, MockRule, ProxyConfigState,
    ProxyConfiguration, ProxyMode, StatusRule, TrafficLog,
};
