//! Export requests submitted by an administrator.
//!
//! An [`ExportRequest`] is the cleaned form data of the export screen: the
//! submission filters, the optional column groups, and an optional explicit
//! field selection. Raw values arrive as string pairs (query parameters,
//! form posts, or command line options) and are validated as a whole, so
//! every invalid field is reported at once.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use forms_rs_core::ValidationError;
use serde::{Deserialize, Serialize};

use crate::columns::ExportOptions;
use crate::query::SubmissionQuery;
use crate::source::SubmissionSource;

/// Date format accepted for the date range fields.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// A validated export request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    /// Case-insensitive substring of the form name.
    pub form_name: Option<String>,
    pub language: Option<String>,
    /// First sent date to include.
    pub from_date: Option<NaiveDate>,
    /// Last sent date to include.
    pub to_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub options: ExportOptions,
    /// Field ids to export instead of the current schema, in order.
    pub fields: Vec<String>,
}

impl ExportRequest {
    /// Cleans raw `(name, value)` pairs into a request.
    ///
    /// Recognized names are `form_name`, `language`, `from_date`, `to_date`,
    /// `with_user_verification`, `with_extended_data`, `with_user_data`, and
    /// `fields` (repeatable). Unknown names are ignored. Blank values count as
    /// absent. Checkboxes accept `on`, `true`, `1`, and `yes`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with per-field errors: code `invalid`
    /// for an unparseable date and code `date_order` (on `from_date`) when the
    /// range is reversed.
    ///
    /// # Examples
    ///
    /// ```
    /// use forms_rs_export::request::ExportRequest;
    ///
    /// let request = ExportRequest::from_pairs([
    ///     ("form_name", "contact"),
    ///     ("from_date", "2018-10-01"),
    ///     ("with_user_data", "on"),
    /// ])
    /// .unwrap();
    /// assert!(request.options.with_user_data);
    ///
    /// let err = ExportRequest::from_pairs([("to_date", "yesterday")]).unwrap_err();
    /// assert_eq!(err.codes_for("to_date"), vec!["invalid"]);
    /// ```
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = Self::default();
        let mut errors: BTreeMap<String, Vec<ValidationError>> = BTreeMap::new();

        for (name, value) in pairs {
            let value = value.trim();
            match name {
                "form_name" => request.form_name = non_empty(value),
                "language" => request.language = non_empty(value),
                "from_date" => match parse_date(value) {
                    Ok(date) => request.from_date = date,
                    Err(e) => errors.entry(name.to_string()).or_default().push(e),
                },
                "to_date" => match parse_date(value) {
                    Ok(date) => request.to_date = date,
                    Err(e) => errors.entry(name.to_string()).or_default().push(e),
                },
                "with_user_verification" => request.options.with_user_verification = is_checked(value),
                "with_extended_data" => request.options.with_extended_data = is_checked(value),
                "with_user_data" => request.options.with_user_data = is_checked(value),
                "fields" => {
                    if !value.is_empty() {
                        request.fields.push(value.to_string());
                    }
                }
                _ => {}
            }
        }

        if let (Some(from), Some(to)) = (request.from_date, request.to_date) {
            if from > to {
                errors.entry("from_date".to_string()).or_default().push(
                    ValidationError::new("Start date must not be after end date.", "date_order")
                        .with_param("from_date", from.to_string())
                        .with_param("to_date", to.to_string()),
                );
            }
        }

        if errors.is_empty() {
            Ok(request)
        } else {
            Err(ValidationError::with_field_errors(errors))
        }
    }

    /// Narrows `source` to the submissions this request exports.
    ///
    /// Drafts are always excluded.
    pub fn query<S: SubmissionSource>(&self, source: S) -> SubmissionQuery<S> {
        let mut query = SubmissionQuery::new(source).sent_only();
        if let Some(name) = &self.form_name {
            query = query.name_contains(name);
        }
        if let Some(language) = &self.language {
            query = query.language(language.clone());
        }
        if let Some(from) = self.from_date {
            query = query.from_date(from);
        }
        if let Some(to) = self.to_date {
            query = query.to_date(to);
        }
        query
    }

    /// Returns `true` if the request names explicit fields.
    pub fn has_field_selection(&self) -> bool {
        !self.fields.is_empty()
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn is_checked(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes")
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::new("Enter a valid date.", "invalid").with_param("value", value))
}
