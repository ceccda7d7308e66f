//! Instrumented submission sources.
//!
//! [`CountingSource`] counts how many times the engine traverses its input,
//! which catches accidental extra passes over large exports.
//! [`FailingSource`] yields a read error after a number of good records.

use std::sync::atomic::{AtomicUsize, Ordering};

use forms_rs_core::{FormsError, FormsResult};
use forms_rs_export::{Records, Submission, SubmissionSource};

/// An in-memory source that counts traversals.
#[derive(Debug, Default)]
pub struct CountingSource {
    submissions: Vec<Submission>,
    passes: AtomicUsize,
}

impl CountingSource {
    pub fn new(submissions: Vec<Submission>) -> Self {
        Self {
            submissions,
            passes: AtomicUsize::new(0),
        }
    }

    /// Number of times [`SubmissionSource::records`] was called.
    pub fn passes(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.passes.store(0, Ordering::SeqCst);
    }
}

impl SubmissionSource for CountingSource {
    fn records(&self) -> FormsResult<Records<'_>> {
        self.passes.fetch_add(1, Ordering::SeqCst);
        self.submissions.records()
    }
}

/// A source that fails with a serialization error after `good` records.
#[derive(Debug)]
pub struct FailingSource {
    submissions: Vec<Submission>,
    good: usize,
}

impl FailingSource {
    pub fn new(submissions: Vec<Submission>, good: usize) -> Self {
        Self { submissions, good }
    }
}

impl SubmissionSource for FailingSource {
    fn records(&self) -> FormsResult<Records<'_>> {
        let good = self.submissions.iter().take(self.good).cloned().map(Ok);
        let failure = std::iter::once(Err(FormsError::SerializationError(format!(
            "record {} is unreadable",
            self.good + 1
        ))));
        Ok(Box::new(good.chain(failure)))
    }
}
