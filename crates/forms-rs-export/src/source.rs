//! Re-iterable sources of submission records.
//!
//! The engine makes two passes over its input (schema discovery, then row
//! emission). Each pass calls [`SubmissionSource::records`] again, which
//! re-acquires the underlying data and yields a fresh single-pass iterator,
//! so no source ever needs to hold every submission in memory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use forms_rs_core::{FormsError, FormsResult};

use crate::submission::Submission;

/// A single pass over a source's submissions.
pub type Records<'a> = Box<dyn Iterator<Item = FormsResult<Submission>> + 'a>;

/// An ordered collection of submissions that can be traversed repeatedly.
///
/// The first record of a traversal is treated as the most recent submission.
pub trait SubmissionSource {
    /// Starts a new traversal.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be opened.
    fn records(&self) -> FormsResult<Records<'_>>;
}

impl SubmissionSource for [Submission] {
    fn records(&self) -> FormsResult<Records<'_>> {
        Ok(Box::new(self.iter().cloned().map(Ok)))
    }
}

impl SubmissionSource for Vec<Submission> {
    fn records(&self) -> FormsResult<Records<'_>> {
        self.as_slice().records()
    }
}

impl<S: SubmissionSource + ?Sized> SubmissionSource for &S {
    fn records(&self) -> FormsResult<Records<'_>> {
        (**self).records()
    }
}

/// Submissions stored one JSON object per line.
///
/// The file is re-opened for every traversal and read line by line. Blank
/// lines are skipped.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    /// Creates a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubmissionSource for JsonLinesSource {
    fn records(&self) -> FormsResult<Records<'_>> {
        let file = File::open(&self.path).map_err(|e| {
            FormsError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to open {}: {e}", self.path.display()),
            ))
        })?;
        tracing::debug!("Reading submissions from {}", self.path.display());

        let lines = BufReader::new(file).lines().enumerate();
        Ok(Box::new(lines.filter_map(|(index, line)| match line {
            Err(e) => Some(Err(FormsError::IoError(e))),
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str::<Submission>(&line).map_err(|e| {
                FormsError::SerializationError(format!("line {}: {e}", index + 1))
            })),
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn ids(source: &dyn SubmissionSource) -> Vec<u64> {
        source
            .records()
            .unwrap()
            .map(|r| r.unwrap().id)
            .collect()
    }

    #[test]
    fn test_vec_source_is_reiterable() {
        let source = vec![Submission::new(2), Submission::new(1)];
        assert_eq!(ids(&source), vec![2, 1]);
        assert_eq!(ids(&source), vec![2, 1]);
    }

    #[test]
    fn test_reference_source() {
        let source = vec![Submission::new(4)];
        let by_ref = &source;
        assert_eq!(ids(&by_ref), vec![4]);
    }

    #[test]
    fn test_json_lines_source_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 10, "sent_at": "2020-01-02T03:04:05"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id": 11}}"#).unwrap();

        let source = JsonLinesSource::new(file.path());
        assert_eq!(ids(&source), vec![10, 11]);
        assert_eq!(ids(&source), vec![10, 11]);
    }

    #[test]
    fn test_json_lines_source_reports_line_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 1}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let source = JsonLinesSource::new(file.path());
        let results: Vec<_> = source.records().unwrap().collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_json_lines_source_missing_file() {
        let source = JsonLinesSource::new("/nonexistent/submissions.jsonl");
        let err = source.records().err().unwrap();
        assert!(matches!(err, FormsError::IoError(_)));
        assert!(err.to_string().contains("/nonexistent/submissions.jsonl"));
    }
}
