//! Payload helper functions for Crux Core
//!
//! Database values arrive as JSON text. Sensors and the LED are primitive
//! leaves, so anything that is not the expected JSON primitive falls back to
//! that primitive's default instead of failing. Strings are never parsed:
//! `"41.2"` is not a number and `"true"` is not a boolean.

use serde_json::Value;

fn parse(data: Option<&str>) -> Option<Value> {
    data.and_then(|data| serde_json::from_str(data).ok())
}

/// Coerces a JSON payload into a reading.
///
/// Only JSON numbers are accepted; everything else is `0.0`.
///
/// # Example
/// ```
/// use sensor_panel_core::payload::coerce_f64;
/// assert_eq!(coerce_f64(Some("23.5")), 23.5);
/// assert_eq!(coerce_f64(Some("\"23.5\"")), 0.0);
/// assert_eq!(coerce_f64(None), 0.0);
/// ```
pub fn coerce_f64(data: Option<&str>) -> f64 {
    match parse(data) {
        Some(Value::Number(number)) => number.as_f64().unwrap_or_default(),
        _ => 0.0,
    }
}

/// Coerces a JSON payload into a switch state.
///
/// Only JSON booleans are accepted; everything else is `false`.
pub fn coerce_bool(data: Option<&str>) -> bool {
    matches!(parse(data), Some(Value::Bool(true)))
}

/// Encodes a switch state as the JSON written to the database.
pub fn encode_bool(value: bool) -> String {
    Value::Bool(value).to_string()
}
