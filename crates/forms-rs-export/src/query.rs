//! Filtering of submission sources.
//!
//! [`SubmissionQuery`] narrows a source the way the submissions admin list
//! does: by form, by a case-insensitive form name search, by language, by a
//! sent date range, and to sent submissions only. A query is itself a
//! [`SubmissionSource`], so the engine traverses it like any other input.

use chrono::NaiveDate;
use forms_rs_core::FormsResult;

use crate::source::{Records, SubmissionSource};
use crate::submission::Submission;

/// A filtered view of a submission source.
///
/// # Examples
///
/// ```
/// use forms_rs_export::query::SubmissionQuery;
/// use forms_rs_export::source::SubmissionSource;
/// use forms_rs_export::submission::Submission;
///
/// let mut sent = Submission::new(1);
/// sent.name = "Contact us".to_string();
/// sent.sent_at = chrono::NaiveDate::from_ymd_opt(2018, 10, 24)
///     .and_then(|d| d.and_hms_opt(12, 0, 0));
/// let draft = Submission::new(2);
///
/// let submissions = vec![sent, draft];
/// let query = SubmissionQuery::new(&submissions).name_contains("CONTACT").sent_only();
/// let ids: Vec<u64> = query.records().unwrap().map(|r| r.unwrap().id).collect();
/// assert_eq!(ids, vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct SubmissionQuery<S> {
    source: S,
    form_id: Option<u64>,
    name_contains: Option<String>,
    language: Option<String>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    sent_only: bool,
}

impl<S: SubmissionSource> SubmissionQuery<S> {
    /// Creates an unfiltered query over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            form_id: None,
            name_contains: None,
            language: None,
            from_date: None,
            to_date: None,
            sent_only: false,
        }
    }

    /// Keeps submissions of the given form plugin.
    #[must_use]
    pub fn form(mut self, form_id: u64) -> Self {
        self.form_id = Some(form_id);
        self
    }

    /// Keeps submissions whose form name contains `needle`, ignoring case and
    /// surrounding whitespace. An empty needle matches everything.
    #[must_use]
    pub fn name_contains(mut self, needle: &str) -> Self {
        let needle = needle.trim().to_lowercase();
        self.name_contains = (!needle.is_empty()).then_some(needle);
        self
    }

    /// Keeps submissions in the given language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Keeps submissions sent on or after `date`.
    #[must_use]
    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    /// Keeps submissions sent on or before `date`.
    #[must_use]
    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }

    /// Drops submissions that were only saved and never sent.
    #[must_use]
    pub fn sent_only(mut self) -> Self {
        self.sent_only = true;
        self
    }

    /// Returns `true` if `submission` passes every filter of this query.
    pub fn matches(&self, submission: &Submission) -> bool {
        if self.sent_only && !submission.is_sent() {
            return false;
        }
        if self.form_id.is_some() && submission.form_id != self.form_id {
            return false;
        }
        if let Some(needle) = &self.name_contains {
            if !submission.name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if &submission.language != language {
                return false;
            }
        }
        if self.from_date.is_some() || self.to_date.is_some() {
            let Some(sent) = submission.sent_at.map(|at| at.date()) else {
                return false;
            };
            if self.from_date.is_some_and(|from| sent < from) {
                return false;
            }
            if self.to_date.is_some_and(|to| sent > to) {
                return false;
            }
        }
        true
    }
}

impl<S: SubmissionSource> SubmissionSource for SubmissionQuery<S> {
    fn records(&self) -> FormsResult<Records<'_>> {
        let records = self.source.records()?;
        Ok(Box::new(records.filter(move |record| {
            record.as_ref().map_or(true, |submission| self.matches(submission))
        })))
    }
}
