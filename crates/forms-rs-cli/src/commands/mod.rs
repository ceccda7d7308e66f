//! Built-in management commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait.

pub mod exportfields;
pub mod exportsubmissions;
pub mod filters;

pub use exportfields::ExportfieldsCommand;
pub use exportsubmissions::{ExportsubmissionsCommand, OutputFormat};

use forms_rs_core::FormsError;

use crate::command::CommandRegistry;

/// Registers all built-in management commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ExportfieldsCommand));
    registry.register(Box::new(ExportsubmissionsCommand));
}

/// Maps a failed blocking task to an IO error.
pub(crate) fn join_error(err: tokio::task::JoinError) -> FormsError {
    FormsError::IoError(std::io::Error::other(format!("Export task failed: {err}")))
}

/// Prints `text` to stdout without blocking the runtime.
pub(crate) async fn write_stdout(text: String) -> Result<(), FormsError> {
    tokio::task::spawn_blocking(move || {
        use std::io::Write;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    })
    .await
    .map_err(join_error)??;
    Ok(())
}
