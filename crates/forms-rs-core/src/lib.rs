//! # forms-rs-core
//!
//! Core types shared by every forms-rs crate. This crate has no dependency on
//! the export engine and provides the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Export and logging settings
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FormsError, FormsResult, ValidationError};
pub use settings::{ExportSettings, Settings};
