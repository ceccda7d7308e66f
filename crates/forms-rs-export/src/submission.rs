//! Submission records handed to the export engine.

use chrono::NaiveDateTime;
use forms_rs_core::{FormsError, FormsResult};
use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::profile::{ClientProfile, Profile};

/// The user account that sent a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionUser {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    /// The client profile, absent for staff and legacy accounts.
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// One stored form submission.
///
/// `data` holds the serialized field list exactly as the form plugin stored
/// it; [`Submission::fields`] decodes it on demand so that records can be
/// streamed without decoding every answer up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: u64,
    /// The form plugin this submission belongs to.
    #[serde(default)]
    pub form_id: Option<u64>,
    /// The form name at the time of submission.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: String,
    /// When the submission was sent. `None` for drafts that were only saved.
    #[serde(default)]
    pub sent_at: Option<NaiveDateTime>,
    /// JSON array of stored fields.
    #[serde(default = "empty_data")]
    pub data: String,
    #[serde(default)]
    pub user: Option<SubmissionUser>,
}

fn empty_data() -> String {
    "[]".to_string()
}

impl Submission {
    /// Creates a submission with no fields and no user.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            form_id: None,
            name: String::new(),
            language: String::new(),
            sent_at: None,
            data: empty_data(),
            user: None,
        }
    }

    /// Stores `fields` as this submission's serialized data.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::SerializationError`] if a value cannot be encoded.
    pub fn set_fields(&mut self, fields: &[Field]) -> FormsResult<()> {
        self.data = serde_json::to_string(fields)
            .map_err(|e| FormsError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Decodes the stored field list.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::Decode`] if `data` is not a JSON array of fields.
    pub fn fields(&self) -> FormsResult<Vec<Field>> {
        serde_json::from_str(&self.data).map_err(|e| FormsError::Decode {
            submission: self.id,
            message: e.to_string(),
        })
    }

    /// Returns `true` if the submission was sent rather than only saved.
    pub const fn is_sent(&self) -> bool {
        self.sent_at.is_some()
    }

    /// The client profile of the submitting user, if both exist.
    pub fn profile(&self) -> Option<&dyn ClientProfile> {
        self.user
            .as_ref()
            .and_then(|user| user.profile.as_ref())
            .map(|profile| profile as &dyn ClientProfile)
    }
}
