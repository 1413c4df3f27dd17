//! User domain model.
//!
//! # Responsibility
//! - Define the stored user record and its create payload.
//! - Validate form-level constraints before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another user.
//! - `national_id` is exactly ten ASCII digits.
//! - `birth_date` parses strictly as `jYYYY/jMM/jDD`.

use crate::calendar::format::{parse_strict, ParseFormat, JALALI_CANONICAL_FORMAT};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a stored user.
///
/// Kept as a string so lists written by older clients (non-UUID ids) still load.
pub type UserId = String;

/// Maximum length of first and last names, in characters.
pub const MAX_NAME_CHARS: usize = 50;
/// Inclusive upper bound for `age`.
pub const MAX_AGE: u32 = 150;
/// Avatar used when the user does not upload a photo.
pub const DEFAULT_AVATAR: &str = "assets/default-avatar.png";

/// Selectable education levels, lowest first.
pub const EDUCATION_OPTIONS: [&str; 5] = [
    "دیپلم",
    "کاردانی",
    "کارشناسی",
    "کارشناسی ارشد",
    "دکتری",
];

static NATIONAL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid national id regex"));

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    /// Required field is empty after trimming.
    Required(&'static str),
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
    AgeOutOfRange(u32),
    UnknownEducation(String),
    InvalidNationalId(String),
    InvalidBirthDate(String),
    /// Birth date outside the picker bounds (future, or more than 150 years ago).
    BirthDateOutOfRange(String),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id cannot be empty"),
            Self::Required(field) => write!(f, "{field} is required"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::AgeOutOfRange(age) => write!(f, "age ({age}) must be between 0 and {MAX_AGE}"),
            Self::UnknownEducation(value) => write!(f, "unknown education level `{value}`"),
            Self::InvalidNationalId(value) => {
                write!(f, "national id `{value}` must be exactly 10 digits")
            }
            Self::InvalidBirthDate(value) => {
                write!(f, "birth date `{value}` is not a valid jYYYY/jMM/jDD date")
            }
            Self::BirthDateOutOfRange(value) => {
                write!(f, "birth date `{value}` is outside the allowed range")
            }
        }
    }
}

impl Error for UserValidationError {}

/// User record without an id, as submitted by the create form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub education: String,
    pub national_id: String,
    /// Jalali `jYYYY/jMM/jDD`.
    pub birth_date: String,
    /// Data URL or asset path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub education: String,
    pub national_id: String,
    /// Jalali `jYYYY/jMM/jDD`.
    pub birth_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

impl UserDraft {
    /// Checks every form constraint.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_name("firstName", &self.first_name)?;
        validate_name("lastName", &self.last_name)?;

        if self.age > MAX_AGE {
            return Err(UserValidationError::AgeOutOfRange(self.age));
        }

        if self.education.trim().is_empty() {
            return Err(UserValidationError::Required("education"));
        }
        if !EDUCATION_OPTIONS.contains(&self.education.as_str()) {
            return Err(UserValidationError::UnknownEducation(self.education.clone()));
        }

        if self.national_id.is_empty() {
            return Err(UserValidationError::Required("nationalId"));
        }
        if !NATIONAL_ID_RE.is_match(&self.national_id) {
            return Err(UserValidationError::InvalidNationalId(
                self.national_id.clone(),
            ));
        }

        if self.birth_date.trim().is_empty() {
            return Err(UserValidationError::Required("birthDate"));
        }
        let format = [ParseFormat::Pattern(JALALI_CANONICAL_FORMAT)];
        if parse_strict::<NaiveDate>(&self.birth_date, &format).is_none() {
            return Err(UserValidationError::InvalidBirthDate(
                self.birth_date.clone(),
            ));
        }

        Ok(())
    }

    /// Attaches a freshly generated id.
    pub fn into_user(self) -> User {
        self.into_user_with_id(new_user_id())
    }

    /// Attaches a caller-provided id.
    pub fn into_user_with_id(self, id: impl Into<UserId>) -> User {
        User {
            id: id.into(),
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            education: self.education,
            national_id: self.national_id,
            birth_date: self.birth_date,
            profile_photo: self.profile_photo,
        }
    }
}

impl User {
    /// Checks the id plus every form constraint.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        self.to_draft().validate()
    }

    /// Returns the record without its id.
    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            age: self.age,
            education: self.education.clone(),
            national_id: self.national_id.clone(),
            birth_date: self.birth_date.clone(),
            profile_photo: self.profile_photo.clone(),
        }
    }

    /// Display name used by list rows and confirm dialogs.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Photo to render, falling back to the default avatar.
    pub fn avatar(&self) -> &str {
        self.profile_photo
            .as_deref()
            .filter(|photo| !photo.is_empty())
            .unwrap_or(DEFAULT_AVATAR)
    }
}

/// Generates a new random user id.
pub fn new_user_id() -> UserId {
    Uuid::new_v4().to_string()
}

fn validate_name(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::Required(field));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(UserValidationError::TooLong {
            field,
            max_chars: MAX_NAME_CHARS,
        });
    }
    Ok(())
}
