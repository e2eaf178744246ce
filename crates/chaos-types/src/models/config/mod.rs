//! Chaos configuration model.

pub mod coerce;
mod enums;
mod lookup;
mod proxy;
mod routes;
mod rules;
mod throttle;

pub use enums::{FailureMode, ProxyMode};
pub use proxy::{
    normalize, serialize, ProxyConfigState, ProxyConfiguration, DEFAULT_CHAOS_ROUTES,
    DEFAULT_TARGET_BACKEND, DEFAULT_TARGET_FRONTEND, DEFAULT_TARGET_UNIFIED,
};
pub use routes::{join_routes, split_routes, ROUTE_SEPARATOR};
pub use rules::{
    HeaderFlag, HeaderRules, MockRule, MockRulePatch, StatusRule, StatusRulePatch,
    DEFAULT_ERROR_RATE, DEFAULT_MOCK_BODY, DEFAULT_STATUS_CODE,
};
pub use throttle::{Throttle, ThrottleField};
