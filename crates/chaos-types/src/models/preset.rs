//! Network presets and preset detection.
//!
//! A configuration is classified against the preset table once, when it is
//! loaded. Manual throttle edits afterwards always label the editor
//! [`CUSTOM_PRESET_ID`]; freehand values are never snapped back onto a
//! preset label.

use serde::Serialize;

use super::config::{FailureMode, Throttle};
use crate::error::{ConfigError, Result};

/// Label for throttle values that match no preset.
pub const CUSTOM_PRESET_ID: &str = "custom";

/// Id of the all-zero preset.
pub const UNLIMITED_PRESET_ID: &str = "unlimited";

/// Named throttle combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub throttle: Throttle,
}

/// Fixed, ordered preset table.
pub const NETWORK_PRESETS: [NetworkPreset; 5] = [
    NetworkPreset { id: UNLIMITED_PRESET_ID, label: "Unlimited / Clear", throttle: Throttle::UNLIMITED },
    NetworkPreset { id: "fast4g", label: "Fast 4G", throttle: Throttle::new(50, 80, 750, 2000, 30) },
    NetworkPreset { id: "slow4g", label: "Slow 4G", throttle: Throttle::new(150, 200, 250, 750, 120) },
    NetworkPreset { id: "3g", label: "3G", throttle: Throttle::new(300, 400, 40, 100, 200) },
    NetworkPreset { id: "edge", label: "EDGE", throttle: Throttle::new(600, 800, 10, 30, 500) },
];

/// Look up a preset by id, case-insensitively.
pub fn find_preset(id: &str) -> Result<&'static NetworkPreset> {
    NETWORK_PRESETS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| ConfigError::UnknownPreset { id: id.to_string() })
}

/// Classify loaded throttle values.
///
/// `unlimited` requires all five fields at zero *and* no connection fault.
/// Any other preset matches on its five values alone. Everything else is
/// [`CUSTOM_PRESET_ID`].
pub fn classify(throttle: &Throttle, failure_mode: FailureMode) -> &'static str {
    if throttle.is_zero() {
        return if failure_mode.is_normal() { UNLIMITED_PRESET_ID } else { CUSTOM_PRESET_ID };
    }
    NETWORK_PRESETS
        .iter()
        .filter(|p| p.id != UNLIMITED_PRESET_ID)
        .find(|p| p.throttle == *throttle)
        .map_or(CUSTOM_PRESET_ID, |p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast4g_on_load() {
        let t = Throttle::new(50, 80, 750, 2000, 30);
        assert_eq!(classify(&t, FailureMode::Normal), "fast4g");
    }

    #[test]
    fn test_all_zero_normal_is_unlimited() {
        assert_eq!(classify(&Throttle::default(), FailureMode::Normal), "unlimited");
    }

    #[test]
    fn test_all_zero_with_fault_is_custom() {
        assert_eq!(classify(&Throttle::default(), FailureMode::Timeout), CUSTOM_PRESET_ID);
    }

    #[test]
    fn test_near_miss_is_custom() {
        let t = Throttle::new(50, 80, 750, 2000, 31);
        assert_eq!(classify(&t, FailureMode::Normal), CUSTOM_PRESET_ID);
    }

    #[test]
    fn test_every_preset_classifies_as_itself() {
        for preset in &NETWORK_PRESETS {
            assert_eq!(classify(&preset.throttle, FailureMode::Normal), preset.id);
        }
    }

    #[test]
    fn test_find_preset() {
        assert_eq!(find_preset("EDGE").map(|p| p.throttle.jitter_ms), Ok(500));
        assert!(find_preset("5g").is_err());
    }
}
