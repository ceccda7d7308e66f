//! Stored form fields and their per-kind export strategies.
//!
//! A [`Field`] is one answered question decoded from a submission's stored
//! data. How its value becomes a spreadsheet cell depends on the field plugin
//! that produced it, which is captured by [`FieldKind`] and the
//! [`FieldExporter`] strategy each kind maps to.

use forms_rs_core::ExportSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of field plugin that produced a stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text input.
    #[default]
    Text,
    /// Multi-line text area.
    #[serde(rename = "textarea")]
    TextArea,
    /// Email input.
    Email,
    /// Numeric input.
    Number,
    /// Hidden input with a fixed value.
    Hidden,
    /// Drop-down with a single choice.
    Select,
    /// Radio buttons.
    Radio,
    /// Select or checkbox group allowing several choices.
    MultipleSelect,
    /// Single checkbox.
    Boolean,
    /// Consent checkboxes.
    Consent,
    /// Uploaded file.
    File,
    /// Uploaded image.
    Image,
}

impl FieldKind {
    /// Returns the export strategy for this kind.
    pub fn exporter(self) -> &'static dyn FieldExporter {
        match self {
            Self::Text | Self::TextArea | Self::Email | Self::Number | Self::Hidden => {
                &TextExporter
            }
            Self::Select | Self::Radio | Self::MultipleSelect => &ChoiceExporter,
            Self::Boolean => &BooleanExporter,
            Self::Consent => &ConsentExporter,
            Self::File | Self::Image => &FileExporter,
        }
    }
}

/// Renders a stored field value into a single export cell.
pub trait FieldExporter: Send + Sync {
    /// Converts `value` into the cell text.
    fn export(&self, value: &Value, settings: &ExportSettings) -> String;
}

/// Strings verbatim; other scalars through their JSON text.
#[derive(Debug, Clone, Copy)]
pub struct TextExporter;

impl FieldExporter for TextExporter {
    fn export(&self, value: &Value, settings: &ExportSettings) -> String {
        scalar_text(value, settings)
    }
}

/// A chosen option verbatim, or several options joined by the separator.
///
/// Empty options in a list are skipped, so `["a", "", "b"]` renders as `a, b`
/// with the default separator.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceExporter;

impl FieldExporter for ChoiceExporter {
    fn export(&self, value: &Value, settings: &ExportSettings) -> String {
        match value {
            Value::Array(items) => join(items.iter().map(|v| scalar_text(v, settings)), settings),
            other => scalar_text(other, settings),
        }
    }
}

/// Booleans as the configured yes/no labels.
#[derive(Debug, Clone, Copy)]
pub struct BooleanExporter;

impl FieldExporter for BooleanExporter {
    fn export(&self, value: &Value, settings: &ExportSettings) -> String {
        scalar_text(value, settings)
    }
}

/// Agreed consents as their titles.
///
/// Consents without a title are skipped.
#[derive(Debug, Clone, Copy)]
pub struct ConsentExporter;

impl FieldExporter for ConsentExporter {
    fn export(&self, value: &Value, settings: &ExportSettings) -> String {
        match value {
            Value::Array(consents) => join(
                consents.iter().map(|consent| match consent {
                    Value::Object(map) => map
                        .get("title")
                        .map(|title| scalar_text(title, settings))
                        .unwrap_or_default(),
                    other => scalar_text(other, settings),
                }),
                settings,
            ),
            other => scalar_text(other, settings),
        }
    }
}

/// Uploaded files as their URL, falling back to the file name.
#[derive(Debug, Clone, Copy)]
pub struct FileExporter;

impl FieldExporter for FileExporter {
    fn export(&self, value: &Value, settings: &ExportSettings) -> String {
        match value {
            Value::Object(map) => map
                .get("url")
                .filter(|url| !url.is_null())
                .or_else(|| map.get("name"))
                .map(|v| scalar_text(v, settings))
                .unwrap_or_default(),
            other => scalar_text(other, settings),
        }
    }
}

fn scalar_text(value: &Value, settings: &ExportSettings) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => settings.yes_no(*b).to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Joins the non-empty parts with the configured separator.
fn join(parts: impl Iterator<Item = String>, settings: &ExportSettings) -> String {
    parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(&settings.multi_value_separator)
}

/// One answered question decoded from a submission's stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier of the logical field, e.g. `email-2`.
    pub field_id: String,
    /// Internal field name, if the plugin stored one.
    #[serde(default)]
    pub name: String,
    /// Display label; empty for internal fields that are never exported.
    #[serde(default)]
    pub label: String,
    /// The plugin kind that produced the value.
    #[serde(default)]
    pub kind: FieldKind,
    /// The stored answer.
    #[serde(default)]
    pub value: Value,
}

impl Field {
    /// Creates a text field.
    pub fn new(
        field_id: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            name: String::new(),
            label: label.into(),
            kind: FieldKind::Text,
            value: value.into(),
        }
    }

    /// Sets the field kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns `true` if this field carries a label and so takes part in exports.
    pub fn is_exportable(&self) -> bool {
        !self.label.is_empty()
    }

    /// Renders the value through this field's kind exporter.
    pub fn export_value(&self, settings: &ExportSettings) -> String {
        self.kind.exporter().export(&self.value, settings)
    }
}

/// Returns the display label of a field id: the part before the last `-`.
///
/// Ids without a `-` discriminator are displayed whole. Splitting such an id
/// at its last `-` would leave nothing before it and give an empty header.
///
/// ```
/// use forms_rs_export::field::display_label;
///
/// assert_eq!(display_label("email-2"), "email");
/// assert_eq!(display_label("first-name-7"), "first-name");
/// assert_eq!(display_label("consent"), "consent");
/// ```
pub fn display_label(field_id: &str) -> &str {
    field_id.rsplit_once('-').map_or(field_id, |(prefix, _)| prefix)
}
