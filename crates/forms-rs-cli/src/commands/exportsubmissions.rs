//! The `exportsubmissions` management command.
//!
//! Exports the filtered submissions of a JSON lines file as CSV or JSON, to
//! stdout or a file.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use forms_rs_core::logging::export_span;
use forms_rs_core::{ExportSettings, FormsError, Settings};
use forms_rs_export::{Dataset, ExportRequest, Exporter, JsonLinesSource};

use crate::command::ManagementCommand;
use crate::commands::filters::{
    add_column_arguments, add_source_arguments, input_path, request_from_matches,
};
use crate::commands::{join_error, write_stdout};

/// Output formats of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(FormsError::ConfigurationError(format!(
                "Unknown export format '{other}'"
            ))),
        }
    }
}

/// Writes the filtered submissions of a file as a table.
pub struct ExportsubmissionsCommand;

/// Exports the submissions of `input` selected by `request`.
///
/// With an explicit field selection only those fields are exported;
/// otherwise every current field is, and stale fields are logged.
pub fn export_submissions(
    input: &Path,
    request: &ExportRequest,
    settings: &ExportSettings,
) -> Result<Dataset, FormsError> {
    let span = export_span(request.form_name.as_deref().unwrap_or("*"));
    let _guard = span.enter();

    let source = JsonLinesSource::new(input);
    let query = request.query(&source);
    let mut exporter = Exporter::new(&query).with_settings(settings.clone());
    if let Some(name) = &request.form_name {
        exporter = exporter.with_title(name.clone());
    }

    if request.has_field_selection() {
        exporter.dataset(&request.fields, &request.options)
    } else {
        Ok(exporter.export(&request.options)?.dataset)
    }
}

/// Serializes `dataset` in the given format.
pub fn render_dataset(
    dataset: &Dataset,
    format: OutputFormat,
    settings: &ExportSettings,
) -> Result<String, FormsError> {
    match format {
        OutputFormat::Csv => dataset.to_csv(settings),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&dataset.to_json())
                .map_err(|e| FormsError::SerializationError(e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Writes `rendered` to `path`, or to stdout when no path is given.
pub async fn write_export(rendered: String, path: Option<&str>) -> Result<(), FormsError> {
    let Some(path) = path else {
        return write_stdout(rendered).await;
    };
    tokio::fs::write(path, rendered.as_bytes()).await.map_err(|e| {
        FormsError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to write to {path}: {e}"),
        ))
    })?;
    tracing::info!("Export written to {path}");
    Ok(())
}

#[async_trait]
impl ManagementCommand for ExportsubmissionsCommand {
    fn name(&self) -> &'static str {
        "exportsubmissions"
    }

    fn help(&self) -> &'static str {
        "Export form submissions as CSV or JSON"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        add_column_arguments(add_source_arguments(cmd))
            .arg(
                clap::Arg::new("format")
                    .long("format")
                    .value_parser(["csv", "json"])
                    .default_value("csv")
                    .help("Output format"),
            )
            .arg(
                clap::Arg::new("output")
                    .long("output")
                    .short('o')
                    .help("Output file path (default: stdout)"),
            )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormsError> {
        let request = request_from_matches(matches)?;
        let input = input_path(matches)?;
        let format = matches
            .get_one::<String>("format")
            .map_or(Ok(OutputFormat::Csv), |f| f.parse())?;
        let output = matches.get_one::<String>("output").cloned();
        let export_settings = settings.export.clone();

        tracing::info!("Exporting submissions from {}", input.display());
        let rendered = tokio::task::spawn_blocking(move || {
            let dataset = export_submissions(&input, &request, &export_settings)?;
            tracing::info!("Exported {} rows", dataset.height());
            render_dataset(&dataset, format, &export_settings)
        })
        .await
        .map_err(join_error)??;

        write_export(rendered, output.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let mut dataset = Dataset::new(vec!["Timestamp".into(), "name".into()]);
        dataset
            .append(vec!["24.10.2018 12:43:00".into(), "Alice".into()])
            .unwrap();
        dataset
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xlsx".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }

    #[test]
    fn test_render_csv() {
        let text = render_dataset(&sample(), OutputFormat::Csv, &ExportSettings::default()).unwrap();
        assert_eq!(text, "Timestamp,name\n24.10.2018 12:43:00,Alice\n");
    }

    #[test]
    fn test_render_json() {
        let text =
            render_dataset(&sample(), OutputFormat::Json, &ExportSettings::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "Alice");
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_write_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        let path_str = path.to_str().unwrap();

        write_export("a,b\n".to_string(), Some(path_str)).await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "a,b\n");
    }

    #[tokio::test]
    async fn test_write_export_to_missing_directory() {
        let err = write_export(String::new(), Some("/nonexistent/dir/export.csv"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to write to"));
    }

    #[test]
    fn test_command_metadata() {
        let cmd = ExportsubmissionsCommand;
        assert_eq!(cmd.name(), "exportsubmissions");
        assert!(!cmd.help().is_empty());
    }
}
