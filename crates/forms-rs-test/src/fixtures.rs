//! Builders for submissions and client profiles.
//!
//! ## Example
//!
//! ```rust
//! use forms_rs_export::ClientType;
//! use forms_rs_test::fixtures::{at, ProfileBuilder, SubmissionBuilder};
//!
//! let submission = SubmissionBuilder::new(1)
//!     .name("Contact")
//!     .sent_at(at(2018, 10, 24, 12, 43, 0))
//!     .field("name-1", "Name", "Alice")
//!     .profile(ProfileBuilder::new(ClientType::Individual).code("A-1").build())
//!     .build();
//! assert_eq!(submission.fields().unwrap().len(), 1);
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use forms_rs_export::{
    ClientType, Field, FieldKind, Identity, IndividualPerson, LegalPerson, Profile, Submission,
    SubmissionUser,
};
use serde_json::Value;

/// Builds a timestamp from its parts.
///
/// # Panics
///
/// Panics if the parts do not form a valid date and time.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    date(year, month, day)
        .and_hms_opt(hour, minute, second)
        .unwrap_or_else(|| panic!("invalid time {hour}:{minute}:{second}"))
}

/// Builds a date from its parts.
///
/// # Panics
///
/// Panics if the parts do not form a valid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid date {year}-{month}-{day}"))
}

/// Builder for [`Submission`] fixtures.
#[derive(Debug, Clone)]
pub struct SubmissionBuilder {
    submission: Submission,
    fields: Vec<Field>,
    profile: Option<Profile>,
}

impl SubmissionBuilder {
    /// Starts a draft submission with the given id.
    pub fn new(id: u64) -> Self {
        Self {
            submission: Submission::new(id),
            fields: Vec::new(),
            profile: None,
        }
    }

    #[must_use]
    pub fn form(mut self, form_id: u64) -> Self {
        self.submission.form_id = Some(form_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.submission.name = name.to_string();
        self
    }

    #[must_use]
    pub fn language(mut self, language: &str) -> Self {
        self.submission.language = language.to_string();
        self
    }

    #[must_use]
    pub fn sent_at(mut self, sent_at: NaiveDateTime) -> Self {
        self.submission.sent_at = Some(sent_at);
        self
    }

    /// Adds a text field.
    #[must_use]
    pub fn field(self, field_id: &str, label: &str, value: impl Into<Value>) -> Self {
        self.field_of_kind(field_id, label, value, FieldKind::Text)
    }

    /// Adds a field produced by the given plugin kind.
    #[must_use]
    pub fn field_of_kind(
        mut self,
        field_id: &str,
        label: &str,
        value: impl Into<Value>,
        kind: FieldKind,
    ) -> Self {
        self.fields.push(Field::new(field_id, label, value).with_kind(kind));
        self
    }

    /// Attaches a user account with the given client profile.
    #[must_use]
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Replaces the stored data with raw text, bypassing field encoding.
    #[must_use]
    pub fn raw_data(mut self, data: &str) -> Self {
        self.fields.clear();
        self.submission.data = data.to_string();
        self
    }

    /// Finishes the submission.
    ///
    /// # Panics
    ///
    /// Panics if the fields cannot be encoded.
    pub fn build(self) -> Submission {
        let mut submission = self.submission;
        if !self.fields.is_empty() {
            submission
                .set_fields(&self.fields)
                .unwrap_or_else(|e| panic!("cannot encode fixture fields: {e}"));
        }
        if let Some(profile) = self.profile {
            submission.user = Some(SubmissionUser {
                id: submission.id,
                username: format!("client{}", submission.id),
                profile: Some(profile),
            });
        }
        submission
    }
}

/// Builder for [`Profile`] fixtures.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    pub fn new(client: ClientType) -> Self {
        Self {
            profile: Profile::new(client),
        }
    }

    #[must_use]
    pub fn code(mut self, code: &str) -> Self {
        self.profile.client_code = code.to_string();
        self
    }

    #[must_use]
    pub fn identity(mut self, first_name: &str, last_name: &str, email: &str) -> Self {
        self.profile.identity = Identity {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        };
        self
    }

    #[must_use]
    pub fn registration_signed(mut self) -> Self {
        self.profile.verification.registration_signed = true;
        self
    }

    /// Marks the MSP status as verified on `on`.
    #[must_use]
    pub fn msp_verified(mut self, on: NaiveDate) -> Self {
        self.profile.verification.msp_status_verified = true;
        self.profile.verification.msp_verification_date = Some(on);
        self
    }

    #[must_use]
    pub fn individual(mut self, identification_number: &str, phone: &str, address: &str) -> Self {
        self.profile.individual_person = Some(IndividualPerson {
            identification_number: identification_number.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
        });
        self
    }

    #[must_use]
    pub fn legal(mut self, ico: &str, dic: &str, company_name: &str, place_of_business: &str) -> Self {
        self.profile.legal_person = Some(LegalPerson {
            ico: ico.to_string(),
            dic: dic.to_string(),
            company_name: company_name.to_string(),
            place_of_business: place_of_business.to_string(),
        });
        self
    }

    pub fn build(self) -> Profile {
        self.profile
    }
}
