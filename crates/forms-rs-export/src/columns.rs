//! Export options, column groups, and header construction.
//!
//! A header is always laid out as: the sent-at column, the verification
//! group, the extended client group, the user group, then one column per
//! exported field. Groups that were not requested are left out entirely;
//! groups that were requested are present in every row.

use forms_rs_core::{ExportSettings, FormsError, FormsResult};
use serde::{Deserialize, Serialize};

use crate::field::display_label;
use crate::profile::ClientType;
use crate::source::SubmissionSource;

/// The optional column groups requested for an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Add registration and MSP verification columns.
    pub with_user_verification: bool,
    /// Add client-type specific identity columns.
    pub with_extended_data: bool,
    /// Add name, email, and client classification columns.
    pub with_user_data: bool,
}

/// Registration and MSP verification headers.
pub const VERIFICATION_HEADERS: [&str; 3] = [
    "Registration signed",
    "MSP status verified",
    "MSP status verification date",
];

/// Extended headers for private individuals.
pub const INDIVIDUAL_HEADERS: [&str; 3] = ["Identification number", "Phone number", "Address"];

/// Extended headers for businesses and legal entities.
pub const LEGAL_HEADERS: [&str; 4] = ["ICO", "DIC", "Company name", "Business address"];

/// User identity headers.
pub const USER_HEADERS: [&str; 5] = ["First name", "Last name", "Email", "Client type", "Client code"];

/// Which identity record fills the extended group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtendedKind {
    /// Identification number, phone, and address of a private individual.
    Individual,
    /// Registration numbers, name, and address of a legal entity.
    Legal,
}

impl ExtendedKind {
    /// The extended kind used for clients of the given type.
    pub const fn for_client(client: ClientType) -> Self {
        if client.is_individual() {
            Self::Individual
        } else {
            Self::Legal
        }
    }

    /// Header labels of this group.
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Individual => &INDIVIDUAL_HEADERS,
            Self::Legal => &LEGAL_HEADERS,
        }
    }

    /// Number of columns in this group.
    pub const fn width(self) -> usize {
        self.headers().len()
    }
}

/// The resolved set of optional column groups of one export.
///
/// Unlike [`ExportOptions`], the extended group is already bound to a
/// concrete [`ExtendedKind`], so every row of the export uses the same cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnLayout {
    pub verification: bool,
    pub extended: Option<ExtendedKind>,
    pub user: bool,
}

impl ColumnLayout {
    /// Resolves `options` against a submission source.
    ///
    /// When extended data is requested, the client type of the first
    /// submission (in source order) whose user has a profile decides the
    /// extended group for the whole export.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::MissingClientType`] if extended data is requested
    /// and no submission has a profile, or any error raised while reading the
    /// source.
    pub fn resolve<S>(options: &ExportOptions, source: &S) -> FormsResult<Self>
    where
        S: SubmissionSource + ?Sized,
    {
        let extended = if options.with_extended_data {
            let client = first_client_type(source)?.ok_or(FormsError::MissingClientType)?;
            tracing::debug!("Extended columns follow client type {client}");
            Some(ExtendedKind::for_client(client))
        } else {
            None
        };

        Ok(Self {
            verification: options.with_user_verification,
            extended,
            user: options.with_user_data,
        })
    }

    /// Number of columns before the field columns, including the sent-at column.
    pub fn leading_width(&self) -> usize {
        let verification = usize::from(self.verification) * VERIFICATION_HEADERS.len();
        let user = usize::from(self.user) * USER_HEADERS.len();
        1 + verification + self.extended.map_or(0, ExtendedKind::width) + user
    }

    /// Total number of columns for `field_count` field columns.
    pub fn width(&self, field_count: usize) -> usize {
        self.leading_width() + field_count
    }
}

fn first_client_type<S>(source: &S) -> FormsResult<Option<ClientType>>
where
    S: SubmissionSource + ?Sized,
{
    for submission in source.records()? {
        if let Some(profile) = submission?.profile() {
            return Ok(Some(profile.client_type()));
        }
    }
    Ok(None)
}

/// Builds the header row for `field_ids` under `layout`.
///
/// Field ids are shown without their `-<suffix>` discriminator.
pub fn build_header<T: AsRef<str>>(
    field_ids: &[T],
    layout: &ColumnLayout,
    settings: &ExportSettings,
) -> Vec<String> {
    let mut headers = Vec::with_capacity(layout.width(field_ids.len()));
    headers.push(settings.timestamp_label.clone());

    if layout.verification {
        headers.extend(VERIFICATION_HEADERS.iter().map(ToString::to_string));
    }
    if let Some(kind) = layout.extended {
        headers.extend(kind.headers().iter().map(ToString::to_string));
    }
    if layout.user {
        headers.extend(USER_HEADERS.iter().map(ToString::to_string));
    }

    headers.extend(
        field_ids
            .iter()
            .map(|id| display_label(id.as_ref()).to_string()),
    );
    headers
}
