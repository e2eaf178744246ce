//! Permissive value coercion for loosely typed input.
//!
//! Form inputs and older engines hand over numbers as strings, booleans or
//! `null`. Every numeric field goes through `Number(x) || 0` semantics: a value
//! that does not convert becomes 0 instead of an error.

use serde_json::Value;

/// Largest integer the engine stores: its numeric fields are signed 64-bit.
pub const MAX_WIRE_INT: u64 = i64::MAX as u64;

/// Numeric value of `value` with JavaScript `Number()` rules, `NaN` when it
/// does not convert.
pub fn number_of(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        },
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => number_of_str(s),
        // Arrays convert through their string form: [] -> "" -> 0, [x] -> String(x).
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [Value::Null] => 0.0,
            [Value::Bool(_)] | [Value::Object(_)] => f64::NAN,
            [single] => number_of(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Numeric value of a string with JavaScript `Number()` rules.
pub fn number_of_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {},
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
        }
    }

    // f64::from_str also accepts "inf" and "nan", which Number() does not.
    let plausible = s.bytes().any(|b| b.is_ascii_digit())
        && s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !plausible {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// `Number(x) || 0`, narrowed to a non-negative integer.
///
/// Fractions truncate, negatives and non-finite values become 0, and large
/// values saturate at [`MAX_WIRE_INT`].
pub fn integer_of(n: f64) -> u64 {
    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX
    (n.trunc() as u64).min(MAX_WIRE_INT)
}

/// Coerce a loosely typed value to a non-negative integer.
pub fn coerce_u64(value: &Value) -> u64 {
    integer_of(number_of(value))
}

/// Coerce form input to a non-negative integer.
pub fn coerce_u64_str(raw: &str) -> u64 {
    integer_of(number_of_str(raw))
}

/// Saturating narrowing for status codes.
pub fn to_u16(n: u64) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Clamp to a percentage in [0, 100].
pub fn to_percent(n: u64) -> u8 {
    // min(100) always fits
    n.min(100) as u8
}

/// Loose boolean: JSON booleans, non-zero numbers and the usual truthy words.
pub fn flag_of(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => flag_of_str(s),
        _ => false,
    }
}

/// Loose boolean for form input.
pub fn flag_of_str(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// String form of an id or text value; numbers keep their JSON spelling.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(coerce_u64(&json!(150)), 150);
        assert_eq!(coerce_u64(&json!(12.9)), 12);
        assert_eq!(coerce_u64(&json!("  300 ")), 300);
        assert_eq!(coerce_u64(&json!("1e3")), 1000);
        assert_eq!(coerce_u64(&json!("0x10")), 16);
        assert_eq!(coerce_u64(&json!(true)), 1);
    }

    #[test]
    fn test_malformed_becomes_zero() {
        assert_eq!(coerce_u64(&json!("")), 0);
        assert_eq!(coerce_u64(&json!("abc")), 0);
        assert_eq!(coerce_u64(&json!("12abc")), 0);
        assert_eq!(coerce_u64(&json!("inf")), 0);
        assert_eq!(coerce_u64(&json!("NaN")), 0);
        assert_eq!(coerce_u64(&json!(null)), 0);
        assert_eq!(coerce_u64(&json!({"a": 1})), 0);
        assert_eq!(coerce_u64(&json!([1, 2])), 0);
        assert_eq!(coerce_u64(&json!("Infinity")), 0);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(coerce_u64(&json!(-5)), 0);
        assert_eq!(coerce_u64_str("-250"), 0);
    }

    #[test]
    fn test_large_values_saturate_at_signed_width() {
        assert_eq!(coerce_u64_str("1e30"), MAX_WIRE_INT);
        assert_eq!(coerce_u64(&json!(1e19)), MAX_WIRE_INT);
        assert_eq!(coerce_u64_str("9223372036854775807"), MAX_WIRE_INT);
        assert_eq!(coerce_u64_str("0xffffffffffffffff"), MAX_WIRE_INT);
        assert_eq!(coerce_u64_str("4611686018427387904"), 1 << 62);
    }

    #[test]
    fn test_single_element_array() {
        assert_eq!(coerce_u64(&json!(["42"])), 42);
        assert_eq!(coerce_u64(&json!([])), 0);
        assert_eq!(coerce_u64(&json!([true])), 0);
    }

    #[test]
    fn test_percent_and_status_narrowing() {
        assert_eq!(to_percent(150), 100);
        assert_eq!(to_percent(42), 42);
        assert_eq!(to_u16(70_000), u16::MAX);
        assert_eq!(to_u16(503), 503);
    }

    #[test]
    fn test_flags() {
        assert!(flag_of(&json!(true)));
        assert!(flag_of(&json!("on")));
        assert!(flag_of(&json!(1)));
        assert!(!flag_of(&json!("nope")));
        assert!(!flag_of(&json!(null)));
    }
}
