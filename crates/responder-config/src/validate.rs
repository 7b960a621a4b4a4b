//! Validation helpers and parsing utilities for configuration values.

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::model::MAX_DEPTH_LIMIT;

/// Parse a boolean toggle from its textual form.
///
/// Accepts `1/0`, `true/false`, `yes/no` and `on/off`, ignoring case and
/// surrounding whitespace.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for any other input.
pub fn parse_bool(field: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(raw.to_string()),
            reason: "must be a boolean",
        }),
    }
}

/// Parse a depth limit from its textual form.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the input is not an integer or
/// falls outside `1..=MAX_DEPTH_LIMIT`.
pub fn parse_depth(field: &str, raw: &str) -> ConfigResult<usize> {
    let depth = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(raw.to_string()),
            reason: "must be an integer",
        })?;
    validate_depth(field, depth)
}

/// Read a boolean toggle from a JSON value.
///
/// Strings are accepted in addition to JSON booleans so documents written by
/// hand can use the same spellings as environment variables.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value cannot be read as a
/// boolean.
pub fn bool_from_value(field: &str, value: &Value) -> ConfigResult<bool> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::String(raw) => parse_bool(field, raw),
        other => Err(ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(other.to_string()),
            reason: "must be a boolean",
        }),
    }
}

/// Read a depth limit from a JSON value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a positive
/// integer within range.
pub fn depth_from_value(field: &str, value: &Value) -> ConfigResult<usize> {
    let depth = value
        .as_u64()
        .and_then(|raw| usize::try_from(raw).ok())
        .ok_or_else(|| ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(value.to_string()),
            reason: "must be an integer",
        })?;
    validate_depth(field, depth)
}

fn validate_depth(field: &str, depth: usize) -> ConfigResult<usize> {
    if !(1..=MAX_DEPTH_LIMIT).contains(&depth) {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(depth.to_string()),
            reason: "must be between 1 and 1024",
        });
    }
    Ok(depth)
}
