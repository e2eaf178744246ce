//! Domain models for the chaos proxy control client.

pub mod config;
pub mod editor;
pub mod evaluate;
pub mod preset;
pub mod rule_list;
pub mod traffic;

pub use config::{
    join_routes, normalize, serialize, split_routes, FailureMode, HeaderFlag, HeaderRules,
    MockRule, MockRulePatch, ProxyConfigState, ProxyConfiguration, ProxyMode, StatusRule,
    StatusRulePatch, Throttle, ThrottleField,
};
pub use editor::{
    ConnectionState, EditState, EditorState, OriginTarget, PullOutcome, PullTicket, PushFailure,
    PushOutcome, PushTicket, SAVED_CONFIRMATION,
};
pub use evaluate::{preview, RequestPreview, StatusCandidate, TamperKind};
pub use preset::{classify, find_preset, NetworkPreset, CUSTOM_PRESET_ID, NETWORK_PRESETS};
pub use rule_list::{next_rule_id, Rule, RuleList};
pub use traffic::TrafficLog;
