//! Latency and bandwidth settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{coerce_u64, MAX_WIRE_INT};
use super::lookup::field;

/// The five throttle fields that presets are made of.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub struct Throttle {
    /// Latency added before forwarding the request (ms)
    #[serde(rename = "lagToReq")]
    pub request_delay_ms: u64,
    /// Latency added before returning the response (ms)
    #[serde(rename = "lagToResp")]
    pub response_delay_ms: u64,
    /// Request body throughput ceiling, 0 = unlimited
    #[serde(rename = "bandwidthUp")]
    pub bandwidth_up_bps: u64,
    /// Response body throughput ceiling, 0 = unlimited
    #[serde(rename = "bandwidthDown")]
    pub bandwidth_down_bps: u64,
    /// Random variance on top of the delays (ms)
    #[serde(rename = "jitter")]
    pub jitter_ms: u64,
}

/// Selector for a single throttle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottleField {
    RequestDelay,
    ResponseDelay,
    BandwidthUp,
    BandwidthDown,
    Jitter,
}

impl ThrottleField {
    pub const ALL: [Self; 5] = [
        Self::RequestDelay,
        Self::ResponseDelay,
        Self::BandwidthUp,
        Self::BandwidthDown,
        Self::Jitter,
    ];

    /// Key the engine uses on the wire.
    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::RequestDelay => "lagToReq",
            Self::ResponseDelay => "lagToResp",
            Self::BandwidthUp => "bandwidthUp",
            Self::BandwidthDown => "bandwidthDown",
            Self::Jitter => "jitter",
        }
    }

    /// Descriptive spelling accepted as an alias.
    pub const fn alias(self) -> &'static str {
        match self {
            Self::RequestDelay => "requestDelayMs",
            Self::ResponseDelay => "responseDelayMs",
            Self::BandwidthUp => "bandwidthUpBps",
            Self::BandwidthDown => "bandwidthDownBps",
            Self::Jitter => "jitterMs",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|f| {
            f.wire_key().eq_ignore_ascii_case(key) || f.alias().eq_ignore_ascii_case(key)
        })
    }
}

impl Throttle {
    pub const UNLIMITED: Self = Self::new(0, 0, 0, 0, 0);

    pub const fn new(
        request_delay_ms: u64,
        response_delay_ms: u64,
        bandwidth_up_bps: u64,
        bandwidth_down_bps: u64,
        jitter_ms: u64,
    ) -> Self {
        Self { request_delay_ms, response_delay_ms, bandwidth_up_bps, bandwidth_down_bps, jitter_ms }
    }

    pub const fn get(&self, f: ThrottleField) -> u64 {
        match f {
            ThrottleField::RequestDelay => self.request_delay_ms,
            ThrottleField::ResponseDelay => self.response_delay_ms,
            ThrottleField::BandwidthUp => self.bandwidth_up_bps,
            ThrottleField::BandwidthDown => self.bandwidth_down_bps,
            ThrottleField::Jitter => self.jitter_ms,
        }
    }

    /// Store `value`, saturating at the engine's integer width.
    pub fn set(&mut self, f: ThrottleField, value: u64) {
        let value = value.min(MAX_WIRE_INT);
        match f {
            ThrottleField::RequestDelay => self.request_delay_ms = value,
            ThrottleField::ResponseDelay => self.response_delay_ms = value,
            ThrottleField::BandwidthUp => self.bandwidth_up_bps = value,
            ThrottleField::BandwidthDown => self.bandwidth_down_bps = value,
            ThrottleField::Jitter => self.jitter_ms = value,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::UNLIMITED
    }

    /// Sum of both delays, the lag the engine reports in its traffic log.
    pub const fn total_delay_ms(&self) -> u64 {
        self.request_delay_ms.saturating_add(self.response_delay_ms)
    }

    pub(crate) fn merge_from(&mut self, raw: &Value) {
        for f in ThrottleField::ALL {
            if let Some(v) = field(raw, &[f.wire_key(), f.alias()]) {
                self.set(f, coerce_u64(v));
            }
        }
    }
}
