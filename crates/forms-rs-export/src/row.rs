//! Row construction.

use std::fmt::{self, Write};

use forms_rs_core::{ExportSettings, FormsError, FormsResult};

use crate::columns::{ColumnLayout, ExtendedKind, USER_HEADERS, VERIFICATION_HEADERS};
use crate::field::Field;
use crate::profile::ClientProfile;
use crate::submission::Submission;

/// Builds the data row of `submission` for the given field ids and layout.
///
/// The row always has `layout.width(field_ids.len())` cells: groups without
/// a profile to read from are filled with empty cells and fields missing
/// from the submission are empty strings. If a submission stores the same
/// field id twice, the first occurrence is exported.
///
/// # Errors
///
/// Returns [`FormsError::MissingTimestamp`] if the submission was never sent,
/// or [`FormsError::Decode`] if its data cannot be decoded.
pub fn build_row<T: AsRef<str>>(
    submission: &Submission,
    field_ids: &[T],
    layout: &ColumnLayout,
    settings: &ExportSettings,
) -> FormsResult<Vec<String>> {
    let sent_at = submission.sent_at.ok_or(FormsError::MissingTimestamp {
        submission: submission.id,
    })?;

    let mut row = Vec::with_capacity(layout.width(field_ids.len()));
    row.push(format_with(&sent_at.format(&settings.timestamp_format))?);

    let profile = submission.profile();
    if layout.verification {
        push_verification(&mut row, profile, settings)?;
    }
    if let Some(kind) = layout.extended {
        push_extended(&mut row, profile, kind);
    }
    if layout.user {
        push_user(&mut row, profile);
    }

    let fields = submission.fields()?;
    row.extend(field_ids.iter().map(|id| {
        find_field(&fields, id.as_ref()).map_or_else(String::new, |f| f.export_value(settings))
    }));

    Ok(row)
}

fn find_field<'a>(fields: &'a [Field], field_id: &str) -> Option<&'a Field> {
    fields.iter().find(|f| f.field_id == field_id)
}

/// Renders a chrono format, rejecting invalid format strings instead of panicking.
fn format_with(formatted: &impl fmt::Display) -> FormsResult<String> {
    let mut out = String::new();
    write!(out, "{formatted}").map_err(|_| {
        FormsError::ConfigurationError("Invalid timestamp or date format".to_string())
    })?;
    Ok(out)
}

fn push_verification(
    row: &mut Vec<String>,
    profile: Option<&dyn ClientProfile>,
    settings: &ExportSettings,
) -> FormsResult<()> {
    let Some(profile) = profile else {
        row.extend(std::iter::repeat(String::new()).take(VERIFICATION_HEADERS.len()));
        return Ok(());
    };
    let status = profile.verification_status();
    row.push(settings.yes_no(status.registration_signed).to_string());
    row.push(settings.yes_no(status.msp_status_verified).to_string());
    row.push(match status.msp_verification_date {
        Some(date) => format_with(&date.format(&settings.date_format))?,
        None => String::new(),
    });
    Ok(())
}

fn push_extended(row: &mut Vec<String>, profile: Option<&dyn ClientProfile>, kind: ExtendedKind) {
    match kind {
        ExtendedKind::Individual => {
            match profile.and_then(|p| p.individual_person()) {
                Some(person) => row.extend([
                    person.identification_number.clone(),
                    person.phone.clone(),
                    person.address.clone(),
                ]),
                None => row.extend(std::iter::repeat(String::new()).take(kind.width())),
            }
        }
        ExtendedKind::Legal => match profile.and_then(|p| p.legal_person()) {
            Some(person) => row.extend([
                person.ico.clone(),
                person.dic.clone(),
                person.company_name.clone(),
                person.place_of_business.clone(),
            ]),
            None => row.extend(std::iter::repeat(String::new()).take(kind.width())),
        },
    }
}

fn push_user(row: &mut Vec<String>, profile: Option<&dyn ClientProfile>) {
    let Some(profile) = profile else {
        row.extend(std::iter::repeat(String::new()).take(USER_HEADERS.len()));
        return;
    };
    let identity = profile.identity();
    row.extend([
        identity.first_name.clone(),
        identity.last_name.clone(),
        identity.email.clone(),
        profile.client_type().to_string(),
        profile.client_code().to_string(),
    ]);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::field::FieldKind;
    use crate::profile::{ClientType, Identity, IndividualPerson, LegalPerson, Profile};
    use crate::submission::SubmissionUser;

    fn sent_submission(id: u64, fields: &[Field]) -> Submission {
        let mut s = Submission::new(id);
        s.sent_at = NaiveDate::from_ymd_opt(2018, 3, 7).and_then(|d| d.and_hms_opt(8, 5, 9));
        s.set_fields(fields).unwrap();
        s
    }

    fn attach(submission: &mut Submission, profile: Profile) {
        submission.user = Some(SubmissionUser {
            id: 1,
            username: "client".to_string(),
            profile: Some(profile),
        });
    }

    #[test]
    fn test_timestamp_is_zero_padded() {
        let s = sent_submission(1, &[]);
        let row = build_row::<&str>(&s, &[], &ColumnLayout::default(), &ExportSettings::default())
            .unwrap();
        assert_eq!(row, vec!["07.03.2018 08:05:09"]);
    }

    #[test]
    fn test_missing_timestamp() {
        let s = Submission::new(42);
        let err = build_row::<&str>(&s, &[], &ColumnLayout::default(), &ExportSettings::default())
            .unwrap_err();
        assert!(matches!(err, FormsError::MissingTimestamp { submission: 42 }));
    }

    #[test]
    fn test_invalid_timestamp_format_is_a_configuration_error() {
        let s = sent_submission(1, &[]);
        let settings = ExportSettings {
            timestamp_format: "%Q".to_string(),
            ..ExportSettings::default()
        };
        let err = build_row::<&str>(&s, &[], &ColumnLayout::default(), &settings).unwrap_err();
        assert!(matches!(err, FormsError::ConfigurationError(_)));
    }

    #[test]
    fn test_custom_formats() {
        let mut s = sent_submission(1, &[]);
        let mut profile = Profile::new(ClientType::Business);
        profile.verification.msp_status_verified = true;
        profile.verification.msp_verification_date = NaiveDate::from_ymd_opt(2019, 1, 31);
        attach(&mut s, profile);

        let settings = ExportSettings {
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
            date_format: "%Y/%m/%d".to_string(),
            yes_label: "Áno".to_string(),
            no_label: "Nie".to_string(),
            ..ExportSettings::default()
        };
        let layout = ColumnLayout {
            verification: true,
            ..ColumnLayout::default()
        };
        let row = build_row::<&str>(&s, &[], &layout, &settings).unwrap();
        assert_eq!(row, vec!["2018-03-07 08:05", "Nie", "Áno", "2019/01/31"]);
    }

    #[test]
    fn test_fields_follow_header_order_and_blank_missing() {
        let s = sent_submission(
            1,
            &[
                Field::new("email-2", "Email", "a@x.com"),
                Field::new("name-1", "Name", "Alice"),
            ],
        );
        let row = build_row(
            &s,
            &["name-1", "phone-3", "email-2"],
            &ColumnLayout::default(),
            &ExportSettings::default(),
        )
        .unwrap();
        assert_eq!(row[1..], ["Alice", "", "a@x.com"]);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let s = sent_submission(
            1,
            &[Field::new("a-1", "A", "first"), Field::new("a-1", "A", "second")],
        );
        let row =
            build_row(&s, &["a-1"], &ColumnLayout::default(), &ExportSettings::default()).unwrap();
        assert_eq!(row[1], "first");
    }

    #[test]
    fn test_field_kind_exporter_is_used() {
        let s = sent_submission(
            1,
            &[Field::new("tags-1", "Tags", serde_json::json!(["a", "b"]))
                .with_kind(FieldKind::MultipleSelect)],
        );
        let row =
            build_row(&s, &["tags-1"], &ColumnLayout::default(), &ExportSettings::default())
                .unwrap();
        assert_eq!(row[1], "a, b");
    }

    #[test]
    fn test_groups_without_profile_are_blank() {
        let s = sent_submission(1, &[Field::new("q-1", "Q", "answer")]);
        let layout = ColumnLayout {
            verification: true,
            extended: Some(ExtendedKind::Legal),
            user: true,
        };
        let row = build_row(&s, &["q-1"], &layout, &ExportSettings::default()).unwrap();
        assert_eq!(row.len(), layout.width(1));
        assert!(row[1..13].iter().all(String::is_empty));
        assert_eq!(row[13], "answer");
    }

    #[test]
    fn test_groups_with_individual_profile() {
        let mut s = sent_submission(1, &[]);
        let mut profile = Profile::new(ClientType::Individual);
        profile.client_code = "IND-7".to_string();
        profile.identity = Identity {
            first_name: "Jana".to_string(),
            last_name: "Novak".to_string(),
            email: "jana@example.com".to_string(),
        };
        profile.verification.registration_signed = true;
        profile.verification.msp_verification_date = NaiveDate::from_ymd_opt(2018, 10, 4);
        profile.individual_person = Some(IndividualPerson {
            identification_number: "900101/1234".to_string(),
            phone: "+421 900 000 000".to_string(),
            address: "Hlavna 1, Bratislava".to_string(),
        });
        attach(&mut s, profile);

        let layout = ColumnLayout {
            verification: true,
            extended: Some(ExtendedKind::Individual),
            user: true,
        };
        let row = build_row::<&str>(&s, &[], &layout, &ExportSettings::default()).unwrap();
        assert_eq!(
            row[1..],
            [
                "Yes",
                "No",
                "04.10.2018",
                "900101/1234",
                "+421 900 000 000",
                "Hlavna 1, Bratislava",
                "Jana",
                "Novak",
                "jana@example.com",
                "A",
                "IND-7",
            ]
        );
    }

    #[test]
    fn test_legal_layout_with_individual_profile_is_blank() {
        let mut s = sent_submission(1, &[]);
        let mut profile = Profile::new(ClientType::Individual);
        profile.individual_person = Some(IndividualPerson::default());
        attach(&mut s, profile);

        let layout = ColumnLayout {
            extended: Some(ExtendedKind::Legal),
            ..ColumnLayout::default()
        };
        let row = build_row::<&str>(&s, &[], &layout, &ExportSettings::default()).unwrap();
        assert_eq!(row[1..], ["", "", "", ""]);
    }

    #[test]
    fn test_legal_profile_values() {
        let mut s = sent_submission(1, &[]);
        let mut profile = Profile::new(ClientType::Business);
        profile.legal_person = Some(LegalPerson {
            ico: "12345678".to_string(),
            dic: "2020123456".to_string(),
            company_name: "Acme s.r.o.".to_string(),
            place_of_business: "Kosice".to_string(),
        });
        attach(&mut s, profile);

        let layout = ColumnLayout {
            extended: Some(ExtendedKind::Legal),
            ..ColumnLayout::default()
        };
        let row = build_row::<&str>(&s, &[], &layout, &ExportSettings::default()).unwrap();
        assert_eq!(row[1..], ["12345678", "2020123456", "Acme s.r.o.", "Kosice"]);
    }
}
