//! Loaders that build an [`AssertConfig`] from the environment or a JSON document.

use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::AssertConfig;
use crate::validate::{bool_from_value, depth_from_value, parse_bool, parse_depth};

/// Environment variable toggling the status check on error envelopes.
pub const ENV_STATUS_CODE: &str = "RESPONDER_STATUS_CODE";
/// Environment variable overriding the data depth limit.
pub const ENV_MAX_DEPTH: &str = "RESPONDER_MAX_DEPTH";

const FIELD_STATUS_CODE: &str = "status_code";
const FIELD_MAX_DEPTH: &str = "max_depth";

impl AssertConfig {
    /// Build a configuration from process environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup using the same keys
    /// as [`AssertConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a present value cannot be
    /// parsed.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_STATUS_CODE) {
            config.include_status_in_error = parse_bool(ENV_STATUS_CODE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            config.max_depth = parse_depth(ENV_MAX_DEPTH, &raw)?;
        }
        debug!(
            include_status_in_error = config.include_status_in_error,
            max_depth = config.max_depth,
            "loaded assertion configuration"
        );
        Ok(config)
    }

    /// Build a configuration from a JSON object such as
    /// `{"status_code": false, "max_depth": 16}`.
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnObject`] for non-object documents,
    /// [`ConfigError::UnknownField`] for unrecognised keys, and
    /// [`ConfigError::InvalidField`] for values of the wrong type or range.
    pub fn from_json(document: &Value) -> ConfigResult<Self> {
        let map = document.as_object().ok_or(ConfigError::NotAnObject)?;
        let mut config = Self::default();
        for (key, value) in map {
            match key.as_str() {
                FIELD_STATUS_CODE => {
                    config.include_status_in_error = bool_from_value(FIELD_STATUS_CODE, value)?;
                }
                FIELD_MAX_DEPTH => {
                    config.max_depth = depth_from_value(FIELD_MAX_DEPTH, value)?;
                }
                other => {
                    return Err(ConfigError::UnknownField {
                        field: other.to_string(),
                    });
                }
            }
        }
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for AssertConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = Value::deserialize(deserializer)?;
        Self::from_json(&document).map_err(D::Error::custom)
    }
}
