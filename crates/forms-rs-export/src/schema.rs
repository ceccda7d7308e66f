//! Field schema discovery.
//!
//! Forms change over time: the form builder adds, renames, removes, and
//! reorders fields while old submissions keep the shape they were stored
//! with. The newest submission defines the current schema; any labelled field
//! seen only in older submissions is reported as stale so historical answers
//! are never dropped silently.

use std::collections::HashSet;

use forms_rs_core::{FormsError, FormsResult};
use serde::Serialize;

use crate::field::{display_label, Field};
use crate::submission::Submission;

/// The exportable fields of a submission collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldSchema {
    /// Labelled fields of the newest submission, in stored order.
    pub current: Vec<Field>,
    /// Labelled fields only present in older submissions, in first-seen order.
    pub stale: Vec<Field>,
}

impl FieldSchema {
    /// Ids of the current fields, in order.
    pub fn current_ids(&self) -> Vec<String> {
        self.current.iter().map(|f| f.field_id.clone()).collect()
    }

    /// Ids of the stale fields, in first-seen order.
    pub fn stale_ids(&self) -> Vec<String> {
        self.stale.iter().map(|f| f.field_id.clone()).collect()
    }

    /// Returns `true` if some historical field no longer maps to a current column.
    pub fn has_stale(&self) -> bool {
        !self.stale.is_empty()
    }

    /// Every known field id (current first, then stale) with its header label.
    pub fn choices(&self) -> Vec<(String, String)> {
        self.current
            .iter()
            .chain(&self.stale)
            .map(|f| (f.field_id.clone(), display_label(&f.field_id).to_string()))
            .collect()
    }
}

/// Computes the current and stale fields of a submission sequence.
///
/// The first submission is authoritative for the current schema. Every later
/// labelled field whose id is neither current nor already reported becomes
/// stale. Unlabelled fields are internal and ignored.
///
/// # Errors
///
/// Returns [`FormsError::EmptyInput`] if the sequence is empty, or the first
/// error raised while reading or decoding a submission.
pub fn compute_field_schema<I>(submissions: I) -> FormsResult<FieldSchema>
where
    I: IntoIterator<Item = FormsResult<Submission>>,
{
    let mut submissions = submissions.into_iter();

    let latest = submissions.next().ok_or(FormsError::EmptyInput)??;
    let current: Vec<Field> = latest
        .fields()?
        .into_iter()
        .filter(Field::is_exportable)
        .collect();
    let current_ids: HashSet<String> = current.iter().map(|f| f.field_id.clone()).collect();

    let mut stale = Vec::new();
    let mut stale_ids = HashSet::new();
    let mut scanned = 1_usize;

    for submission in submissions {
        let submission = submission?;
        scanned += 1;
        for field in submission.fields()? {
            if !field.is_exportable() || current_ids.contains(&field.field_id) {
                continue;
            }
            if stale_ids.insert(field.field_id.clone()) {
                tracing::debug!(
                    "Field '{}' of submission {} is not in the current schema",
                    field.field_id,
                    submission.id
                );
                stale.push(field);
            }
        }
    }

    tracing::info!(
        "Scanned {scanned} submissions: {} current fields, {} stale fields",
        current.len(),
        stale.len()
    );

    Ok(FieldSchema { current, stale })
}
