//! The `exportfields` management command.
//!
//! Lists the fields an export would produce for the filtered submissions,
//! plus any stale fields only found in older submissions.

use std::path::Path;

use async_trait::async_trait;
use forms_rs_core::{FormsError, Settings};
use forms_rs_export::{display_label, ExportRequest, Exporter, FieldSchema, JsonLinesSource};
use serde_json::json;

use crate::command::ManagementCommand;
use crate::commands::filters::{add_source_arguments, input_path, request_from_matches};
use crate::commands::{join_error, write_stdout};

/// Prints the current and stale fields of a submission file.
pub struct ExportfieldsCommand;

/// Discovers the field schema of the submissions in `input` that `request` selects.
pub fn discover_fields(input: &Path, request: &ExportRequest) -> Result<FieldSchema, FormsError> {
    let source = JsonLinesSource::new(input);
    let query = request.query(&source);
    Exporter::new(&query).fields_for_export()
}

/// Renders `schema` as a tab separated listing or as JSON.
pub fn render_fields(schema: &FieldSchema, as_json: bool) -> Result<String, FormsError> {
    if as_json {
        let entries = |fields: &[forms_rs_export::Field]| -> Vec<serde_json::Value> {
            fields
                .iter()
                .map(|f| {
                    json!({
                        "field_id": f.field_id,
                        "header": display_label(&f.field_id),
                        "label": f.label,
                    })
                })
                .collect()
        };
        let value = json!({
            "current": entries(&schema.current),
            "stale": entries(&schema.stale),
        });
        let mut out = serde_json::to_string_pretty(&value)
            .map_err(|e| FormsError::SerializationError(e.to_string()))?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for field in &schema.current {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            field.field_id,
            display_label(&field.field_id),
            field.label
        ));
    }
    if schema.has_stale() {
        out.push_str("\nStale fields (not exported by default):\n");
        for field in &schema.stale {
            out.push_str(&format!("{}\t{}\n", field.field_id, field.label));
        }
    }
    Ok(out)
}

#[async_trait]
impl ManagementCommand for ExportfieldsCommand {
    fn name(&self) -> &'static str {
        "exportfields"
    }

    fn help(&self) -> &'static str {
        "List the fields available for export"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        add_source_arguments(cmd).arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Print the fields as JSON"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
    ) -> Result<(), FormsError> {
        let request = request_from_matches(matches)?;
        let input = input_path(matches)?;
        let as_json = matches.get_flag("json");

        tracing::info!("Discovering fields of {}", input.display());
        let schema = tokio::task::spawn_blocking(move || discover_fields(&input, &request))
            .await
            .map_err(join_error)??;

        if schema.has_stale() {
            tracing::warn!(
                "Some submissions contain fields that are no longer part of the form: {}",
                schema.stale_ids().join(", ")
            );
        }

        write_stdout(render_fields(&schema, as_json)?).await
    }
}
