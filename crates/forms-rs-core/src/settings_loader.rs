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
//! | `FORMS_DEBUG` | `debug` |
//! | `FORMS_LOG_LEVEL` | `log_level` |
//! | `FORMS_EXPORT_TIMESTAMP_LABEL` | `export.timestamp_label` |
//! | `FORMS_EXPORT_TIMESTAMP_FORMAT` | `export.timestamp_format` |
//! | `FORMS_EXPORT_DATE_FORMAT` | `export.date_format` |
//! | `FORMS_EXPORT_CSV_DELIMITER` | `export.csv_delimiter` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use forms_rs_core::settings_loader;
//!
//! // Load from TOML
//! let settings = settings_loader::from_toml_file("forms.toml").unwrap();
//!
//! // Load from TOML with environment overrides
//! let settings = settings_loader::from_toml_file_with_env("forms.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FormsError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormsError> {
    // TOML is converted to JSON and deep-merged over the serialized defaults,
    // so nested tables only need to list the keys they change.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormsError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a file, choosing the format by extension (`.json` is
/// JSON, anything else TOML), then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut settings = if is_json {
        from_json_file(path)?
    } else {
        from_toml_file(path)?
    };
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
/// Supported environment variables:
///
/// - `FORMS_DEBUG` -> `debug` (values: "true"/"1"/"yes" => true, anything else => false)
/// - `FORMS_LOG_LEVEL` -> `log_level`
/// - `FORMS_EXPORT_TIMESTAMP_LABEL` -> `export.timestamp_label`
/// - `FORMS_EXPORT_TIMESTAMP_FORMAT` -> `export.timestamp_format`
/// - `FORMS_EXPORT_DATE_FORMAT` -> `export.date_format`
/// - `FORMS_EXPORT_CSV_DELIMITER` -> `export.csv_delimiter` (first character; `\t` for tab)
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Applies overrides read through `lookup`, which maps an environment variable
/// name to its value.
fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("FORMS_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("FORMS_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("FORMS_EXPORT_TIMESTAMP_LABEL") {
        settings.export.timestamp_label = val;
    }

    if let Some(val) = lookup("FORMS_EXPORT_TIMESTAMP_FORMAT") {
        settings.export.timestamp_format = val;
    }

    if let Some(val) = lookup("FORMS_EXPORT_DATE_FORMAT") {
        settings.export.date_format = val;
    }

    if let Some(val) = lookup("FORMS_EXPORT_CSV_DELIMITER") {
        if val == "\\t" {
            settings.export.csv_delimiter = '\t';
        } else if let Some(c) = val.chars().next() {
            settings.export.csv_delimiter = c;
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, FormsError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormsError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, FormsError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormsError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FormsError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

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
