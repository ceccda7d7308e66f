//! Client profiles of submitting users.
//!
//! The optional column groups of an export are read from the submitting
//! user's client profile. Engine code only sees the [`ClientProfile`]
//! capability trait; [`Profile`] is the stored record implementing it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of a client account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientType {
    /// Private individual (`A`).
    Individual,
    /// Self-employed individual (`B`).
    IndividualBusiness,
    /// Legal entity (`C`).
    Business,
    /// Any other classification code.
    Other(char),
}

impl ClientType {
    /// Parses a single-letter classification code.
    pub const fn from_code(code: char) -> Self {
        match code {
            'A' => Self::Individual,
            'B' => Self::IndividualBusiness,
            'C' => Self::Business,
            other => Self::Other(other),
        }
    }

    /// Returns the single-letter classification code.
    pub const fn code(self) -> char {
        match self {
            Self::Individual => 'A',
            Self::IndividualBusiness => 'B',
            Self::Business => 'C',
            Self::Other(code) => code,
        }
    }

    /// Only private individuals use the individual-person record; every other
    /// classification is exported through the legal-person record.
    pub const fn is_individual(self) -> bool {
        matches!(self, Self::Individual)
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ClientType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClientType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::from_code(c)),
            _ => Err(serde::de::Error::custom(format!(
                "client type must be a single letter, got {code:?}"
            ))),
        }
    }
}

/// Registration and MSP verification state of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStatus {
    /// Whether the registration form was signed.
    #[serde(default)]
    pub registration_signed: bool,
    /// Whether the MSP status was verified.
    #[serde(default)]
    pub msp_status_verified: bool,
    /// When the MSP status was verified.
    #[serde(default)]
    pub msp_verification_date: Option<NaiveDate>,
}

/// Name and contact of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// Identity record of a private individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualPerson {
    #[serde(default)]
    pub identification_number: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Identity record of a business or legal entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalPerson {
    /// Company registration number.
    #[serde(default)]
    pub ico: String,
    /// Tax identification number.
    #[serde(default)]
    pub dic: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub place_of_business: String,
}

/// What the export engine needs to know about a submitting client.
pub trait ClientProfile {
    /// The account classification.
    fn client_type(&self) -> ClientType;

    /// The client's account code.
    fn client_code(&self) -> &str;

    /// Registration and MSP verification state.
    fn verification_status(&self) -> &VerificationStatus;

    /// Name and email.
    fn identity(&self) -> &Identity;

    /// The individual-person record, if one exists.
    fn individual_person(&self) -> Option<&IndividualPerson>;

    /// The legal-person record, if one exists.
    fn legal_person(&self) -> Option<&LegalPerson>;
}

/// A stored client profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Classification code (`A`, `B`, `C`, ...).
    pub client: ClientType,
    #[serde(default)]
    pub client_code: String,
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub verification: VerificationStatus,
    #[serde(default)]
    pub individual_person: Option<IndividualPerson>,
    #[serde(default)]
    pub legal_person: Option<LegalPerson>,
}

impl Profile {
    /// Creates a profile with the given classification and no other data.
    pub fn new(client: ClientType) -> Self {
        Self {
            client,
            client_code: String::new(),
            identity: Identity::default(),
            verification: VerificationStatus::default(),
            individual_person: None,
            legal_person: None,
        }
    }
}

impl ClientProfile for Profile {
    fn client_type(&self) -> ClientType {
        self.client
    }

    fn client_code(&self) -> &str {
        &self.client_code
    }

    fn verification_status(&self) -> &VerificationStatus {
        &self.verification
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn individual_person(&self) -> Option<&IndividualPerson> {
        self.individual_person.as_ref()
    }

    fn legal_person(&self) -> Option<&LegalPerson> {
        self.legal_person.as_ref()
    }
}
