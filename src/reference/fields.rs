//! Field coercion for loosely typed CSV columns.
//!
//! Malformed values become `None` rather than a sentinel.

/// Trimmed value, or `None` when absent or blank
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Finite decimal number, or `None`
#[must_use]
pub fn parse_f64(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Integer, accepting decimal text truncated toward zero ("12.9" -> 12)
#[must_use]
pub fn parse_i32(value: Option<&str>) -> Option<i32> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    if let Ok(parsed) = value.parse::<i32>() {
        return Some(parsed);
    }
    parse_f64(Some(value))
        .map(f64::trunc)
        .filter(|v| *v >= f64::from(i32::MIN) && *v <= f64::from(i32::MAX))
        .map(|v| v as i32)
}
