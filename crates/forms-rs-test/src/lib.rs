//! # forms-rs-test
//!
//! Testing utilities for forms-rs. Provides builders for submission and
//! client profile fixtures, instrumented submission sources, and assertion
//! helpers for exported datasets.

pub mod assertions;
pub mod fixtures;
pub mod sources;

pub use assertions::{assert_column, assert_rectangular, write_json_lines};
pub use fixtures::{at, date, ProfileBuilder, SubmissionBuilder};
pub use sources::{CountingSource, FailingSource};
