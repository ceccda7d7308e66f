//! # forms-rs-export
//!
//! Export engine for form builder submissions.
//!
//! Submissions store their answers as a list of labelled fields, and forms
//! evolve over time. This crate turns a collection of submissions into one
//! rectangular table:
//!
//! - **Schema reconciliation** - the newest submission defines the columns,
//!   fields seen only in older submissions are reported as stale
//! - **Conditional columns** - verification, extended client data, and user
//!   data groups, chosen per export
//! - **Sources and queries** - in-memory and JSON lines sources, filtered by
//!   form, name, language, and sent date
//! - **Output** - a [`Dataset`] that serializes to CSV or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use forms_rs_export::{ExportOptions, Exporter, Field, Submission};
//!
//! let mut newest = Submission::new(2);
//! newest.sent_at = chrono::NaiveDate::from_ymd_opt(2018, 10, 24)
//!     .and_then(|d| d.and_hms_opt(9, 0, 0));
//! newest.set_fields(&[Field::new("name-1", "Name", "Alice")]).unwrap();
//!
//! let mut older = Submission::new(1);
//! older.sent_at = chrono::NaiveDate::from_ymd_opt(2018, 10, 23)
//!     .and_then(|d| d.and_hms_opt(9, 0, 0));
//! older.set_fields(&[Field::new("phone-3", "Phone", "555")]).unwrap();
//!
//! let submissions = vec![newest, older];
//! let export = Exporter::new(&submissions).export(&ExportOptions::default()).unwrap();
//! assert_eq!(export.dataset.headers(), ["Timestamp", "name"]);
//! assert_eq!(export.schema.stale_ids(), vec!["phone-3"]);
//! ```

// - doc_markdown: field ids and labels in docs are not code items
// - missing_const_for_fn: builders may gain runtime logic later
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]

pub mod columns;
pub mod dataset;
pub mod exporter;
pub mod field;
pub mod profile;
pub mod query;
pub mod request;
pub mod row;
pub mod schema;
pub mod source;
pub mod submission;

// Re-export primary types at the crate root for convenience.
pub use columns::{build_header, ColumnLayout, ExportOptions, ExtendedKind};
pub use dataset::Dataset;
pub use exporter::{Export, Exporter};
pub use field::{display_label, Field, FieldExporter, FieldKind};
pub use profile::{
    ClientProfile, ClientType, Identity, IndividualPerson, LegalPerson, Profile,
    VerificationStatus,
};
pub use query::SubmissionQuery;
pub use request::ExportRequest;
pub use row::build_row;
pub use schema::{compute_field_schema, FieldSchema};
pub use source::{JsonLinesSource, Records, SubmissionSource};
pub use submission::{Submission, SubmissionUser};
