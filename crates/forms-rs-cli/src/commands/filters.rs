//! Arguments shared by the export commands.
//!
//! Both commands read submissions from a JSON lines file and narrow them with
//! the same filters. Parsed arguments are funnelled through
//! [`ExportRequest::from_pairs`] so that the command line is validated
//! exactly like the export form.

use std::path::PathBuf;

use forms_rs_core::{FormsError, ValidationError};
use forms_rs_export::ExportRequest;

/// Filter options and the request field each one maps to.
const FILTERS: [(&str, &str, &str); 4] = [
    ("form_name", "form-name", "Only submissions whose form name contains this text"),
    ("language", "language", "Only submissions in this language"),
    ("from_date", "from-date", "Only submissions sent on or after this date (YYYY-MM-DD)"),
    ("to_date", "to-date", "Only submissions sent on or before this date (YYYY-MM-DD)"),
];

/// Column group flags and the request field each one maps to.
const GROUP_FLAGS: [(&str, &str, &str); 3] = [
    (
        "with_user_verification",
        "with-user-verification",
        "Add registration and MSP verification columns",
    ),
    (
        "with_extended_data",
        "with-extended-data",
        "Add client type specific identity columns",
    ),
    (
        "with_user_data",
        "with-user-data",
        "Add name, email, and client classification columns",
    ),
];

/// Adds `--input` and the filter options to `cmd`.
pub fn add_source_arguments(cmd: clap::Command) -> clap::Command {
    let cmd = cmd.arg(
        clap::Arg::new("input")
            .long("input")
            .short('i')
            .required(true)
            .help("JSON lines file of submissions, newest first"),
    );
    FILTERS.iter().fold(cmd, |cmd, (id, long, help)| {
        cmd.arg(clap::Arg::new(*id).long(*long).help(*help))
    })
}

/// Adds the column group flags and the repeatable `--field` option to `cmd`.
pub fn add_column_arguments(cmd: clap::Command) -> clap::Command {
    let cmd = GROUP_FLAGS.iter().fold(cmd, |cmd, (id, long, help)| {
        cmd.arg(
            clap::Arg::new(*id)
                .long(*long)
                .action(clap::ArgAction::SetTrue)
                .help(*help),
        )
    });
    cmd.arg(
        clap::Arg::new("field")
            .long("field")
            .short('f')
            .action(clap::ArgAction::Append)
            .help("Field id to export, in order (default: every current field)"),
    )
}

/// Returns the `--input` path.
pub fn input_path(matches: &clap::ArgMatches) -> Result<PathBuf, FormsError> {
    matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| FormsError::ConfigurationError("Missing --input".to_string()))
}

/// Cleans the filter, column group, and field arguments into a request.
///
/// Arguments a command did not declare are ignored.
pub fn request_from_matches(matches: &clap::ArgMatches) -> Result<ExportRequest, ValidationError> {
    let mut pairs: Vec<(&str, &str)> = Vec::new();

    for (id, _, _) in FILTERS {
        if let Ok(Some(value)) = matches.try_get_one::<String>(id) {
            pairs.push((id, value.as_str()));
        }
    }
    for (id, _, _) in GROUP_FLAGS {
        if matches!(matches.try_get_one::<bool>(id), Ok(Some(true))) {
            pairs.push((id, "on"));
        }
    }
    if let Ok(Some(fields)) = matches.try_get_many::<String>("field") {
        pairs.extend(fields.map(|field| ("fields", field.as_str())));
    }

    ExportRequest::from_pairs(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> clap::Command {
        add_column_arguments(add_source_arguments(clap::Command::new("export")))
    }

    #[test]
    fn test_input_is_required() {
        assert!(command().try_get_matches_from(["export"]).is_err());
    }

    #[test]
    fn test_request_from_matches() {
        let matches = command()
            .try_get_matches_from([
                "export",
                "--input",
                "submissions.jsonl",
                "--form-name",
                "contact",
                "--from-date",
                "2018-10-01",
                "--with-user-data",
                "--field",
                "name-1",
                "-f",
                "email-2",
            ])
            .unwrap();

        assert_eq!(input_path(&matches).unwrap(), PathBuf::from("submissions.jsonl"));
        let request = request_from_matches(&matches).unwrap();
        assert_eq!(request.form_name.as_deref(), Some("contact"));
        assert_eq!(request.from_date.map(|d| d.to_string()).as_deref(), Some("2018-10-01"));
        assert!(request.options.with_user_data);
        assert!(!request.options.with_extended_data);
        assert_eq!(request.fields, vec!["name-1", "email-2"]);
    }

    #[test]
    fn test_invalid_date_argument() {
        let matches = command()
            .try_get_matches_from(["export", "-i", "x.jsonl", "--to-date", "31.10.2018"])
            .unwrap();
        let err = request_from_matches(&matches).unwrap_err();
        assert_eq!(err.codes_for("to_date"), vec!["invalid"]);
    }

    #[test]
    fn test_source_only_command_ignores_column_arguments() {
        let matches = add_source_arguments(clap::Command::new("fields"))
            .try_get_matches_from(["fields", "-i", "x.jsonl", "--language", "sk"])
            .unwrap();
        let request = request_from_matches(&matches).unwrap();
        assert_eq!(request.language.as_deref(), Some("sk"));
        assert!(!request.has_field_selection());
    }
}
