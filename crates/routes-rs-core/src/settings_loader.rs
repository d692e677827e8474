//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ROUTES_DEBUG` | `debug` |
//! | `ROUTES_LOG_LEVEL` | `log_level` |
//! | `ROUTES_PREFIX` | `mapper.prefix` (empty clears it) |
//! | `ROUTES_CONTROLLERS` | `controllers` (comma-separated) |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use routes_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/routes.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/routes.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::RoutesError;
use crate::settings::Settings;

/// A settings file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    const fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    fn parse(self, input: &str) -> Result<serde_json::Value, RoutesError> {
        let parsed = match self {
            Self::Toml => toml::from_str::<toml::Value>(input)
                .map(toml_to_json)
                .map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(input).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| {
            RoutesError::ConfigurationError(format!("Failed to parse {}: {e}", self.label()))
        })
    }

    fn load_str(self, input: &str) -> Result<Settings, RoutesError> {
        let value = self.parse(input)?;
        let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
            RoutesError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
        })?;

        serde_json::from_value(merge_json(default_json, value)).map_err(|e| {
            RoutesError::ConfigurationError(format!(
                "Failed to deserialize settings from {}: {e}",
                self.label()
            ))
        })
    }

    fn load_file(self, path: &Path) -> Result<Settings, RoutesError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RoutesError::ConfigurationError(format!(
                "Failed to read {} file '{}': {e}",
                self.label(),
                path.display()
            ))
        })?;
        tracing::debug!(path = %path.display(), format = self.label(), "Loaded settings file");
        self.load_str(&content)
    }
}

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RoutesError> {
    Format::Toml.load_str(toml_str)
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, RoutesError> {
    Format::Toml.load_file(path.as_ref())
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RoutesError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, RoutesError> {
    Format::Json.load_str(json_str)
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, RoutesError> {
    Format::Json.load_file(path.as_ref())
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RoutesError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// - `ROUTES_DEBUG` -> `debug` ("true"/"1"/"yes" => true, anything else => false)
/// - `ROUTES_LOG_LEVEL` -> `log_level`
/// - `ROUTES_PREFIX` -> `mapper.prefix`
/// - `ROUTES_CONTROLLERS` -> `controllers` (comma-separated)
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("ROUTES_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("ROUTES_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("ROUTES_PREFIX") {
        settings.mapper.prefix = if val.is_empty() { None } else { Some(val) };
    }

    if let Ok(val) = std::env::var("ROUTES_CONTROLLERS") {
        settings.controllers = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

// ============================================================
// Helpers
// ============================================================

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
