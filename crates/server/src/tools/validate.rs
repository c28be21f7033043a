//! Field checks shared by the tool validators.
//!
//! Type and enum membership are enforced by deserialization; these helpers
//! cover emptiness, ranges and nested structure.

use std::fmt::Display;

use quickchart_core::Error;
use serde_json::{Map, Value};

/// Inclusive bounds for pixel dimensions.
pub const DIMENSION_RANGE: (u32, u32) = (1, 10_000);

/// Required string: non-empty after trimming.
pub fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{field} must be a non-empty string")));
    }
    Ok(())
}

/// Optional string: non-empty after trimming when present.
pub fn optional_text(field: &str, value: Option<&str>) -> Result<(), Error> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

/// Optional value within an inclusive range.
pub fn check_range<T>(field: &str, value: Option<T>, min: T, max: T) -> Result<(), Error>
where
    T: PartialOrd + Display + Copy,
{
    if let Some(v) = value
        && !(min <= v && v <= max)
    {
        return Err(Error::invalid(format!("{field} must be between {min} and {max}, got {v}")));
    }
    Ok(())
}

/// Optional pixel dimension, 1 to 10000.
pub fn check_dimension(field: &str, value: Option<u32>) -> Result<(), Error> {
    check_range(field, value, DIMENSION_RANGE.0, DIMENSION_RANGE.1)
}

/// Optional ratio or opacity, 0 to 1.
pub fn check_ratio(field: &str, value: Option<f64>) -> Result<(), Error> {
    if let Some(v) = value
        && !v.is_finite()
    {
        return Err(Error::invalid(format!("{field} must be a finite number")));
    }
    check_range(field, value, 0.0, 1.0)
}

/// Optional value restricted to a fixed set.
pub fn check_one_of<T>(field: &str, value: Option<T>, allowed: &[T]) -> Result<(), Error>
where
    T: PartialEq + Display + Copy,
{
    if let Some(v) = value
        && !allowed.contains(&v)
    {
        let valid = allowed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        return Err(Error::invalid(format!("Invalid {field}: {v}. Valid values are: {valid}")));
    }
    Ok(())
}

/// Nested field that must be a JSON object.
pub fn require_object<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a Map<String, Value>, Error> {
    match value {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(Error::invalid(format!("{field} must be an object"))),
        None => Err(Error::invalid(format!("{field} is required"))),
    }
}

/// Nested field that must be a JSON array.
pub fn require_array<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a Vec<Value>, Error> {
    match value {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(Error::invalid(format!("{field} must be an array"))),
    }
}

/// Nested field that must be a non-empty JSON array.
pub fn require_non_empty_array<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a Vec<Value>, Error> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => Ok(items),
        _ => Err(Error::invalid(format!("{field} must be a non-empty array"))),
    }
}
