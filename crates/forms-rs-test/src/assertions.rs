//! Assertion helpers for exported datasets.

use std::path::{Path, PathBuf};

use forms_rs_export::{Dataset, Submission};

/// Asserts that every row of `dataset` is as wide as its header.
///
/// # Panics
///
/// Panics on the first row with a different width.
pub fn assert_rectangular(dataset: &Dataset) {
    let width = dataset.width();
    for (index, row) in dataset.rows().iter().enumerate() {
        assert_eq!(
            row.len(),
            width,
            "Row {index} has {} cells but the header has {width}",
            row.len()
        );
    }
}

/// Asserts the cells of the column with the given header.
///
/// # Panics
///
/// Panics if the header is missing or the cells differ.
pub fn assert_column(dataset: &Dataset, header: &str, expected: &[&str]) {
    let Some(cells) = dataset.column(header) else {
        panic!("No column '{header}' in {:?}", dataset.headers());
    };
    assert_eq!(cells, expected, "Unexpected cells in column '{header}'");
}

/// Writes `submissions` as a JSON lines file named `file_name` inside `dir`.
///
/// # Panics
///
/// Panics if a submission cannot be encoded or the file cannot be written.
pub fn write_json_lines(dir: &Path, file_name: &str, submissions: &[Submission]) -> PathBuf {
    let mut contents = String::new();
    for submission in submissions {
        let line = serde_json::to_string(submission)
            .unwrap_or_else(|e| panic!("cannot encode submission {}: {e}", submission.id));
        contents.push_str(&line);
        contents.push('\n');
    }
    let path = dir.join(file_name);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
    path
}

#[cfg(test)]
mod tests {
    use forms_rs_export::{JsonLinesSource, SubmissionSource};

    use super::*;

    #[test]
    fn test_assert_rectangular_passes() {
        let mut dataset = Dataset::new(vec!["a".into(), "b".into()]);
        dataset.append(vec!["1".into(), "2".into()]).unwrap();
        assert_rectangular(&dataset);
        assert_column(&dataset, "b", &["2"]);
    }

    #[test]
    #[should_panic(expected = "No column 'c'")]
    fn test_assert_column_missing_header() {
        let dataset = Dataset::new(vec!["a".into()]);
        assert_column(&dataset, "c", &[]);
    }

    #[test]
    fn test_write_json_lines_round_trips_through_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json_lines(
            dir.path(),
            "submissions.jsonl",
            &[Submission::new(1), Submission::new(2)],
        );
        let source = JsonLinesSource::new(path);
        let ids: Vec<u64> = source.records().unwrap().map(|r| r.unwrap().id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
