//! # forms-rs
//!
//! Export engine for form builder submissions.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `forms-rs` to get everything, or depend on individual
//! crates for finer-grained control.

/// Errors, settings, settings loading, and logging.
pub use forms_rs_core as core;

/// Schema discovery, column layout, rows, datasets, sources, and queries.
pub use forms_rs_export as export;

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use forms_rs_cli as cli;

/// Fixtures and assertions for tests.
#[cfg(feature = "testing")]
pub use forms_rs_test as test;

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use forms_rs_core::{ExportSettings, FormsError, FormsResult, Settings, ValidationError};
    pub use forms_rs_export::{
        ClientProfile, ClientType, Dataset, Export, ExportOptions, ExportRequest, Exporter, Field,
        FieldKind, FieldSchema, JsonLinesSource, Submission, SubmissionQuery, SubmissionSource,
    };
}

// Third-party re-exports
pub use chrono;
pub use serde;
pub use serde_json;
pub use tracing;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exports_engine() {
        let source: Vec<Submission> = Vec::new();
        let err = Exporter::new(&source).export(&ExportOptions::default()).unwrap_err();
        assert!(matches!(err, FormsError::EmptyInput));
    }
}
