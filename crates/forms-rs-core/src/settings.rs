//! Settings for forms-rs.
//!
//! This module provides the [`Settings`] struct, which holds logging
//! configuration and the [`ExportSettings`] consumed by the export engine.
//! Every field has a default so partial configuration files are valid.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Formatting and serialization settings for submission exports.
///
/// # Examples
///
/// ```
/// use forms_rs_core::settings::ExportSettings;
///
/// let export = ExportSettings::default();
/// assert_eq!(export.timestamp_label, "Timestamp");
/// assert_eq!(export.timestamp_format, "%d.%m.%Y %H:%M:%S");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Header of the leading sent-at column.
    pub timestamp_label: String,
    /// `chrono` format string for the sent-at column.
    pub timestamp_format: String,
    /// `chrono` format string for date cells (e.g. the MSP verification date).
    pub date_format: String,
    /// Separator used when a field stores several values.
    pub multi_value_separator: String,
    /// Rendering of a true boolean cell.
    pub yes_label: String,
    /// Rendering of a false boolean cell.
    pub no_label: String,
    /// Field delimiter of CSV output.
    pub csv_delimiter: char,
    /// Whether CSV output starts with a UTF-8 byte order mark.
    pub csv_bom: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            timestamp_label: "Timestamp".to_string(),
            timestamp_format: "%d.%m.%Y %H:%M:%S".to_string(),
            date_format: "%d.%m.%Y".to_string(),
            multi_value_separator: ", ".to_string(),
            yes_label: "Yes".to_string(),
            no_label: "No".to_string(),
            csv_delimiter: ',',
            csv_bom: false,
        }
    }
}

impl ExportSettings {
    /// Renders a boolean as the configured yes/no label.
    pub fn yes_no(&self, value: bool) -> &str {
        if value {
            &self.yes_label
        } else {
            &self.no_label
        }
    }
}

/// The complete set of forms-rs settings.
///
/// # Examples
///
/// ```
/// use forms_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Debug mode switches logging to a
    /// pretty, human-readable format.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level or `EnvFilter` directive (e.g. "info", "forms_rs_export=debug").
    pub log_level: String,

    // ── Export ───────────────────────────────────────────────────────

    /// Export formatting settings.
    pub export: ExportSettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            export: ExportSettings::default(),
            extra: HashMap::new(),
        }
    }
}
