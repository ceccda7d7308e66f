//! The submission export engine.
//!
//! [`Exporter`] ties the pieces together: it discovers the field schema in a
//! first pass over the source, resolves the optional column groups, builds
//! the header, and then streams the source a second time to emit one row per
//! submission. Any error aborts the export; a partial table is never
//! returned.

use forms_rs_core::{ExportSettings, FormsError, FormsResult};
use serde::Serialize;

use crate::columns::{build_header, ColumnLayout, ExportOptions};
use crate::dataset::Dataset;
use crate::field::Field;
use crate::row::build_row;
use crate::schema::{compute_field_schema, FieldSchema};
use crate::source::SubmissionSource;

/// The result of a full export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Export {
    /// The exported table.
    pub dataset: Dataset,
    /// The schema the table was built from. Stale fields are not exported;
    /// they are reported so an administrator can be told about them.
    pub schema: FieldSchema,
}

impl Export {
    /// Fields only present in older submissions.
    pub fn stale_fields(&self) -> &[Field] {
        &self.schema.stale
    }
}

/// Exports the submissions of a source as a table.
///
/// # Examples
///
/// ```
/// use forms_rs_export::columns::ExportOptions;
/// use forms_rs_export::exporter::Exporter;
/// use forms_rs_export::field::Field;
/// use forms_rs_export::submission::Submission;
///
/// let mut submission = Submission::new(1);
/// submission.sent_at = chrono::NaiveDate::from_ymd_opt(2018, 10, 24)
///     .and_then(|d| d.and_hms_opt(12, 43, 0));
/// submission.set_fields(&[Field::new("name-1", "Name", "Alice")]).unwrap();
///
/// let submissions = vec![submission];
/// let export = Exporter::new(&submissions).export(&ExportOptions::default()).unwrap();
/// assert_eq!(export.dataset.headers(), ["Timestamp", "name"]);
/// assert_eq!(export.dataset.rows()[0], ["24.10.2018 12:43:00", "Alice"]);
/// ```
#[derive(Debug, Clone)]
pub struct Exporter<'a, S: ?Sized> {
    source: &'a S,
    settings: ExportSettings,
    title: Option<String>,
}

impl<'a, S: SubmissionSource + ?Sized> Exporter<'a, S> {
    /// Creates an exporter over `source` with default export settings.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            settings: ExportSettings::default(),
            title: None,
        }
    }

    /// Uses the given export settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the title of produced datasets.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Discovers the current and stale fields of the source.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::EmptyInput`] if the source has no submissions.
    pub fn fields_for_export(&self) -> FormsResult<FieldSchema> {
        compute_field_schema(self.source.records()?)
    }

    /// Resolves the optional column groups for `options`.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::MissingClientType`] if extended data is requested
    /// but no submission has a client profile.
    pub fn layout(&self, options: &ExportOptions) -> FormsResult<ColumnLayout> {
        ColumnLayout::resolve(options, self.source)
    }

    /// Builds the header row for `field_ids` under `layout`.
    pub fn header<T: AsRef<str>>(&self, field_ids: &[T], layout: &ColumnLayout) -> Vec<String> {
        build_header(field_ids, layout, &self.settings)
    }

    /// Exports the given field ids, in order.
    ///
    /// Any field id may be requested, including stale ones; submissions that
    /// do not store a field get an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::EmptyInput`] if the source has no submissions, or
    /// the first error raised while resolving the layout or building a row.
    pub fn dataset<T: AsRef<str>>(
        &self,
        field_ids: &[T],
        options: &ExportOptions,
    ) -> FormsResult<Dataset> {
        let layout = match self.layout(options) {
            Err(FormsError::MissingClientType) if self.source.records()?.next().is_none() => {
                return Err(FormsError::EmptyInput);
            }
            layout => layout?,
        };
        let mut dataset = Dataset::new(self.header(field_ids, &layout));
        if let Some(title) = &self.title {
            dataset.title = Some(title.clone());
        }

        for submission in self.source.records()? {
            let submission = submission?;
            let row = build_row(&submission, field_ids, &layout, &self.settings)?;
            dataset.append(row)?;
        }

        if dataset.height() == 0 {
            return Err(FormsError::EmptyInput);
        }

        tracing::info!(
            "Exported {} submissions with {} columns",
            dataset.height(),
            dataset.width()
        );
        Ok(dataset)
    }

    /// Exports every current field of the source.
    ///
    /// # Errors
    ///
    /// See [`Exporter::fields_for_export`] and [`Exporter::dataset`].
    pub fn export(&self, options: &ExportOptions) -> FormsResult<Export> {
        let schema = self.fields_for_export()?;
        if schema.has_stale() {
            tracing::warn!(
                "{} historical fields are not part of the current form and are not exported: {}",
                schema.stale.len(),
                schema.stale_ids().join(", ")
            );
        }

        let dataset = self.dataset(&schema.current_ids(), options)?;
        Ok(Export { dataset, schema })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::profile::{ClientType, Profile};
    use crate::submission::{Submission, SubmissionUser};

    fn sent(id: u64, fields: &[Field]) -> Submission {
        let mut s = Submission::new(id);
        s.sent_at = NaiveDate::from_ymd_opt(2020, 5, u32::try_from(id).unwrap())
            .and_then(|d| d.and_hms_opt(10, 0, 0));
        s.set_fields(fields).unwrap();
        s
    }

    #[test]
    fn test_export_empty_source() {
        let source: Vec<Submission> = Vec::new();
        let err = Exporter::new(&source).export(&ExportOptions::default()).unwrap_err();
        assert!(matches!(err, FormsError::EmptyInput));
    }

    #[test]
    fn test_dataset_empty_source() {
        let source: Vec<Submission> = Vec::new();
        let err = Exporter::new(&source)
            .dataset(&["a-1"], &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, FormsError::EmptyInput));
    }

    #[test]
    fn test_dataset_empty_source_with_extended_data() {
        let source: Vec<Submission> = Vec::new();
        let options = ExportOptions {
            with_extended_data: true,
            ..ExportOptions::default()
        };
        let err = Exporter::new(&source).dataset(&["a-1"], &options).unwrap_err();
        assert!(matches!(err, FormsError::EmptyInput));
    }

    #[test]
    fn test_dataset_repeated_header_keeps_every_json_cell() {
        let source = vec![
            sent(2, &[Field::new("name-9", "Name", "Alice")]),
            sent(1, &[Field::new("name-1", "Name", "Bob (old)")]),
        ];
        let dataset = Exporter::new(&source)
            .dataset(&["name-9", "name-1"], &ExportOptions::default())
            .unwrap();
        assert_eq!(dataset.headers(), ["Timestamp", "name", "name"]);

        let json = dataset.to_json();
        assert_eq!(json[0]["name"], "Alice");
        assert_eq!(json[0]["name (2)"], "");
        assert_eq!(json[1]["name"], "");
        assert_eq!(json[1]["name (2)"], "Bob (old)");
    }

    #[test]
    fn test_dataset_with_stale_field_selected() {
        let source = vec![
            sent(2, &[Field::new("name-1", "Name", "Bob")]),
            sent(1, &[Field::new("name-1", "Name", "Alice"), Field::new("fax-2", "Fax", "123")]),
        ];
        let dataset = Exporter::new(&source)
            .with_title("Contact")
            .dataset(&["fax-2", "name-1"], &ExportOptions::default())
            .unwrap();
        assert_eq!(dataset.title.as_deref(), Some("Contact"));
        assert_eq!(dataset.headers(), ["Timestamp", "fax", "name"]);
        assert_eq!(dataset.rows()[0][1..], ["", "Bob"]);
        assert_eq!(dataset.rows()[1][1..], ["123", "Alice"]);
    }

    #[test]
    fn test_export_aborts_on_draft() {
        let mut draft = sent(1, &[Field::new("name-1", "Name", "x")]);
        draft.sent_at = None;
        let source = vec![sent(2, &[Field::new("name-1", "Name", "y")]), draft];
        let err = Exporter::new(&source).export(&ExportOptions::default()).unwrap_err();
        assert!(matches!(err, FormsError::MissingTimestamp { submission: 1 }));
    }

    #[test]
    fn test_export_missing_client_type() {
        let source = vec![sent(1, &[Field::new("name-1", "Name", "x")])];
        let options = ExportOptions {
            with_extended_data: true,
            ..ExportOptions::default()
        };
        let err = Exporter::new(&source).export(&options).unwrap_err();
        assert!(matches!(err, FormsError::MissingClientType));
    }

    #[test]
    fn test_export_uses_settings() {
        let mut first = sent(1, &[]);
        first.user = Some(SubmissionUser {
            id: 1,
            username: "c".into(),
            profile: Some(Profile::new(ClientType::Business)),
        });
        let source = vec![first];
        let settings = ExportSettings {
            timestamp_label: "Sent".to_string(),
            ..ExportSettings::default()
        };
        let options = ExportOptions {
            with_user_data: true,
            ..ExportOptions::default()
        };
        let export = Exporter::new(&source)
            .with_settings(settings)
            .export(&options)
            .unwrap();
        assert_eq!(export.dataset.headers()[0], "Sent");
        assert_eq!(export.dataset.column("Client type"), Some(vec!["C"]));
    }
}
