//! Lenient value parsing and Polars `AnyValue` conversions.
//!
//! Source feeds are messy: numeric columns carry `..` markers, blanks and the
//! odd `256.0`. Everything here returns `None` instead of failing so callers
//! can decide on a sentinel.

use polars::prelude::AnyValue;

/// Markers used by statistical sources for "no data".
const MISSING_MARKERS: &[&str] = &["..", "NA", "N/A", "nan", "NaN", "none"];

/// Returns true for empty cells and the known "no data" markers.
///
/// # Examples
///
/// ```
/// use ipalloc_common::is_missing_marker;
///
/// assert!(is_missing_marker(""));
/// assert!(is_missing_marker(" .. "));
/// assert!(!is_missing_marker("0"));
/// ```
pub fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed)
}

/// Parses a string as `f64`, returning `None` for markers and invalid input.
pub fn parse_f64(value: &str) -> Option<f64> {
    if is_missing_marker(value) {
        return None;
    }
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a non-negative integer, accepting integral floats such as `256.0`.
///
/// # Examples
///
/// ```
/// use ipalloc_common::parse_u64;
///
/// assert_eq!(parse_u64("256"), Some(256));
/// assert_eq!(parse_u64("256.0"), Some(256));
/// assert_eq!(parse_u64("-1"), None);
/// assert_eq!(parse_u64("1.5"), None);
/// ```
pub fn parse_u64(value: &str) -> Option<u64> {
    if is_missing_marker(value) {
        return None;
    }
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<u64>() {
        return Some(parsed);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

/// Formats a floating-point number without trailing zeros.
///
/// # Examples
///
/// ```
/// use ipalloc_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(12.50), "12.5");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts a Polars `AnyValue` to a display string; `Null` becomes empty.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts an `AnyValue` to `f64`, parsing strings leniently.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an `AnyValue` to `u64`; negative and fractional values are `None`.
pub fn any_to_u64(value: AnyValue<'_>) -> Option<u64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => u64::try_from(v).ok(),
        AnyValue::Int16(v) => u64::try_from(v).ok(),
        AnyValue::Int32(v) => u64::try_from(v).ok(),
        AnyValue::Int64(v) => u64::try_from(v).ok(),
        AnyValue::UInt8(v) => Some(u64::from(v)),
        AnyValue::UInt16(v) => Some(u64::from(v)),
        AnyValue::UInt32(v) => Some(u64::from(v)),
        AnyValue::UInt64(v) => Some(v),
        AnyValue::Float32(v) => parse_u64(&v.to_string()),
        AnyValue::Float64(v) => parse_u64(&v.to_string()),
        AnyValue::String(s) => parse_u64(s),
        AnyValue::StringOwned(s) => parse_u64(&s),
        _ => None,
    }
}
