//! Tabular export results and their serialization.
//!
//! A [`Dataset`] is a header row plus data rows of string cells. Every row
//! has exactly as many cells as the header. Serialization to CSV uses the
//! `csv` crate; JSON output maps each row to an object keyed by header.

use std::collections::HashSet;
use std::io::Write;

use forms_rs_core::{ExportSettings, FormsError, FormsResult};
use serde::Serialize;

/// UTF-8 byte order mark, which makes spreadsheet applications detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A rectangular table of exported cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    /// Optional title (e.g. the form name), used as a sheet or file name.
    pub title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Creates an empty dataset with the given header row.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            title: None,
            headers,
            rows: Vec::new(),
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends a data row.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::InvalidDimensions`] if the row width differs from
    /// the header width.
    pub fn append(&mut self, row: Vec<String>) -> FormsResult<()> {
        if row.len() != self.headers.len() {
            return Err(FormsError::InvalidDimensions {
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Returns every cell of the column with the given header, if present.
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let index = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Writes the dataset as CSV, header first.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is not an ASCII character or the
    /// writer fails.
    pub fn write_csv<W: Write>(&self, mut writer: W, settings: &ExportSettings) -> FormsResult<()> {
        let delimiter = Some(settings.csv_delimiter)
            .filter(char::is_ascii)
            .and_then(|c| u8::try_from(c).ok())
            .ok_or_else(|| {
                FormsError::ConfigurationError(format!(
                    "CSV delimiter must be an ASCII character, got {:?}",
                    settings.csv_delimiter
                ))
            })?;

        if settings.csv_bom {
            writer.write_all(UTF8_BOM)?;
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        csv_writer.write_record(&self.headers).map_err(csv_error)?;
        for row in &self.rows {
            csv_writer.write_record(row).map_err(csv_error)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Returns the dataset as a CSV string.
    ///
    /// # Errors
    ///
    /// See [`Dataset::write_csv`].
    pub fn to_csv(&self, settings: &ExportSettings) -> FormsResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer, settings)?;
        String::from_utf8(buffer).map_err(|e| FormsError::SerializationError(e.to_string()))
    }

    /// Returns the rows as a JSON array of objects keyed by header.
    ///
    /// A repeated header is keyed `"<header> (2)"`, `"<header> (3)"` and so on,
    /// so every cell of the row is kept.
    pub fn to_json(&self) -> serde_json::Value {
        let keys = self.json_keys();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = keys
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(serde_json::Value::String))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }

    fn json_keys(&self) -> Vec<String> {
        let mut used = HashSet::new();
        self.headers
            .iter()
            .map(|header| {
                let mut key = header.clone();
                let mut n = 2;
                while !used.insert(key.clone()) {
                    key = format!("{header} ({n})");
                    n += 1;
                }
                key
            })
            .collect()
    }
}

fn csv_error(err: csv::Error) -> FormsError {
    FormsError::SerializationError(format!("CSV: {err}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Dataset {
        let mut dataset = Dataset::new(vec!["Timestamp".into(), "name".into(), "note".into()]);
        dataset
            .append(vec!["01.01.2020 10:00:00".into(), "Alice".into(), "says \"hi\", twice".into()])
            .unwrap();
        dataset
            .append(vec!["02.01.2020 11:00:00".into(), "Bob".into(), String::new()])
            .unwrap();
        dataset
    }

    #[test]
    fn test_append_rejects_wrong_width() {
        let mut dataset = Dataset::new(vec!["a".into(), "b".into()]);
        let err = dataset.append(vec!["only one".into()]).unwrap_err();
        assert!(matches!(err, FormsError::InvalidDimensions { expected: 2, found: 1 }));
        assert_eq!(dataset.height(), 0);
    }

    #[test]
    fn test_dimensions_and_column() {
        let dataset = sample();
        assert_eq!(dataset.width(), 3);
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.column("name"), Some(vec!["Alice", "Bob"]));
        assert_eq!(dataset.column("missing"), None);
    }

    #[test]
    fn test_csv_quotes_and_escapes() {
        let csv = sample().to_csv(&ExportSettings::default()).unwrap();
        assert_eq!(
            csv,
            "Timestamp,name,note\n\
             01.01.2020 10:00:00,Alice,\"says \"\"hi\"\", twice\"\n\
             02.01.2020 11:00:00,Bob,\n"
        );
    }

    #[test]
    fn test_csv_delimiter_and_bom() {
        let settings = ExportSettings {
            csv_delimiter: ';',
            csv_bom: true,
            ..ExportSettings::default()
        };
        let mut buffer = Vec::new();
        sample().write_csv(&mut buffer, &settings).unwrap();
        assert!(buffer.starts_with(UTF8_BOM));
        let text = String::from_utf8(buffer[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("Timestamp;name;note\n"));
    }

    #[test]
    fn test_csv_rejects_multibyte_delimiter() {
        let settings = ExportSettings {
            csv_delimiter: '§',
            ..ExportSettings::default()
        };
        let err = sample().to_csv(&settings).unwrap_err();
        assert!(matches!(err, FormsError::ConfigurationError(_)));
    }

    #[test]
    fn test_header_only_csv() {
        let dataset = Dataset::new(vec!["Timestamp".into()]);
        assert_eq!(dataset.to_csv(&ExportSettings::default()).unwrap(), "Timestamp\n");
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(json[1], json!({"Timestamp": "02.01.2020 11:00:00", "name": "Bob", "note": ""}));
    }

    #[test]
    fn test_to_json_repeated_headers() {
        let mut dataset = Dataset::new(vec![
            "Timestamp".into(),
            "name".into(),
            "name".into(),
            "name (2)".into(),
        ]);
        dataset
            .append(vec!["t".into(), "Alice".into(), "Bob".into(), "Carol".into()])
            .unwrap();
        let json = dataset.to_json();
        assert_eq!(
            json[0],
            json!({"Timestamp": "t", "name": "Alice", "name (2)": "Bob", "name (2) (2)": "Carol"})
        );
    }

    #[test]
    fn test_title() {
        let dataset = Dataset::new(vec![]).with_title("Contact");
        assert_eq!(dataset.title.as_deref(), Some("Contact"));
    }
}
