//! Typed error definitions.
//!
//! Normalization of wire input never fails; these errors only arise when an
//! edit names something that does not exist (a field key, a preset id).

mod config;

pub use config::ConfigError;

/// Standard Result type using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = ConfigError::UnknownField { field: "lagToNowhere".to_string() };

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("UnknownField"));
        assert!(json.contains("lagToNowhere"));

        let deserialized: ConfigError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::UnknownPreset { id: "5g".to_string() };
        let msg = format!("{}", err);
        assert!(msg.contains("5g"));
    }
}
