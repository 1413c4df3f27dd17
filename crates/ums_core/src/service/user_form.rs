//! Create/edit form state for a single user.
//!
//! # Responsibility
//! - Hold editable field values, including the picked birth date.
//! - Convert between stored Jalali strings and picker dates.
//! - Produce a validated `UserDraft` on submit.
//!
//! # Invariants
//! - Names and national id are trimmed before validation.
//! - The submitted birth date is rendered as `jYYYY/jMM/jDD`.

use crate::calendar::{
    CalendarDate, DateAdapter, JalaliDateAdapter, ParseFormat, JALALI_CANONICAL_FORMAT,
    JALALI_LENIENT_FORMAT,
};
use crate::model::user::{User, UserDraft, UserId, UserValidationError, DEFAULT_AVATAR, MAX_AGE};
use std::cmp::Ordering;

/// Age prefilled for new users.
pub const DEFAULT_AGE: u32 = 18;

/// Whether the form creates a new user or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(User),
}

/// Editable form model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub mode: FormMode,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub education: String,
    pub national_id: String,
    pub birth_date: Option<CalendarDate>,
    pub profile_photo: String,
}

impl UserForm {
    /// Empty create form: age 18, birth date today, default avatar.
    pub fn create(adapter: &JalaliDateAdapter) -> Self {
        Self {
            mode: FormMode::Create,
            first_name: String::new(),
            last_name: String::new(),
            age: DEFAULT_AGE,
            education: String::new(),
            national_id: String::new(),
            birth_date: Some(adapter.today()),
            profile_photo: DEFAULT_AVATAR.to_string(),
        }
    }

    /// Edit form prefilled from `user`.
    ///
    /// A stored birth date that no longer parses falls back to today.
    pub fn edit(user: User, adapter: &JalaliDateAdapter) -> Self {
        let birth_date = Some(from_jalali(&user.birth_date, adapter));
        let profile_photo = user.avatar().to_string();
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            age: user.age,
            education: user.education.clone(),
            national_id: user.national_id.clone(),
            birth_date,
            profile_photo,
            mode: FormMode::Edit(user),
        }
    }

    /// Dialog title for the current mode.
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "افزودن کاربر جدید",
            FormMode::Edit(_) => "ویرایش کاربر",
        }
    }

    /// Id of the edited user, if any.
    pub fn existing_id(&self) -> Option<&UserId> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(user) => Some(&user.id),
        }
    }

    /// Replaces the photo with an uploaded data URL.
    pub fn set_photo(&mut self, data_url: impl Into<String>) {
        self.profile_photo = data_url.into();
    }

    pub fn use_default_avatar(&mut self) {
        self.profile_photo = DEFAULT_AVATAR.to_string();
    }

    /// Normalizes the fields and builds a validated draft.
    ///
    /// # Errors
    /// - Any field constraint from [`UserDraft::validate`].
    /// - `BirthDateOutOfRange` when the birth date is outside
    ///   [`birth_date_bounds`].
    pub fn to_draft(&self, adapter: &JalaliDateAdapter) -> Result<UserDraft, UserValidationError> {
        if self.age > MAX_AGE {
            return Err(UserValidationError::AgeOutOfRange(self.age));
        }

        let birth_date = self
            .birth_date
            .filter(|date| adapter.is_valid(date))
            .ok_or(UserValidationError::Required("birthDate"))?;
        let (min, max) = birth_date_bounds(adapter);
        let too_early = adapter.compare_date(&birth_date, &min) == Some(Ordering::Less);
        let too_late = adapter.compare_date(&birth_date, &max) == Some(Ordering::Greater);
        if too_early || too_late {
            return Err(UserValidationError::BirthDateOutOfRange(
                adapter.format(&birth_date, JALALI_CANONICAL_FORMAT),
            ));
        }

        let profile_photo = if self.profile_photo.trim().is_empty() {
            DEFAULT_AVATAR.to_string()
        } else {
            self.profile_photo.clone()
        };

        let draft = UserDraft {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            age: self.age,
            education: self.education.clone(),
            national_id: self.national_id.trim().to_string(),
            birth_date: to_jalali(&birth_date, adapter),
            profile_photo: Some(profile_photo),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Allowed birth dates: from 150 years ago up to today.
pub fn birth_date_bounds(adapter: &JalaliDateAdapter) -> (CalendarDate, CalendarDate) {
    let today = adapter.today();
    let min = adapter.add_calendar_years(&today, -i64::from(MAX_AGE));
    (min, today)
}

/// Renders a picker date in the stored Jalali form.
pub fn to_jalali(date: &CalendarDate, adapter: &JalaliDateAdapter) -> String {
    adapter.format(date, JALALI_CANONICAL_FORMAT)
}

/// Reads a stored Jalali string back into a picker date, or today.
pub fn from_jalali(value: &str, adapter: &JalaliDateAdapter) -> CalendarDate {
    let formats = [
        ParseFormat::Pattern(JALALI_CANONICAL_FORMAT),
        ParseFormat::Pattern(JALALI_LENIENT_FORMAT),
    ];
    adapter
        .parse(value, &formats)
        .unwrap_or_else(|| adapter.today())
}

#[cfg(test)]
mod tests {
    use super::{birth_date_bounds, from_jalali, to_jalali, FormMode, UserForm, DEFAULT_AGE};
    use crate::calendar::{DateAdapter, JalaliDateAdapter};
    use crate::model::user::{UserValidationError, DEFAULT_AVATAR};

    fn filled_form(adapter: &JalaliDateAdapter) -> UserForm {
        let mut form = UserForm::create(adapter);
        form.first_name = "  سارا ".to_string();
        form.last_name = "احمدی".to_string();
        form.education = "کارشناسی".to_string();
        form.national_id = " 0012345678 ".to_string();
        form.birth_date = Some(adapter.create_date(1370, 5, 31).unwrap());
        form
    }

    #[test]
    fn create_form_uses_defaults() {
        let adapter = JalaliDateAdapter::new();
        let form = UserForm::create(&adapter);
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(form.age, DEFAULT_AGE);
        assert_eq!(form.profile_photo, DEFAULT_AVATAR);
        assert!(form.birth_date.is_some());
        assert_eq!(form.title(), "افزودن کاربر جدید");
    }

    #[test]
    fn to_draft_trims_and_formats_birth_date() {
        let adapter = JalaliDateAdapter::new();
        let draft = filled_form(&adapter).to_draft(&adapter).unwrap();
        assert_eq!(draft.first_name, "سارا");
        assert_eq!(draft.national_id, "0012345678");
        assert_eq!(draft.birth_date, "1370/06/31");
    }

    #[test]
    fn to_draft_rejects_future_birth_date() {
        let adapter = JalaliDateAdapter::new();
        let mut form = filled_form(&adapter);
        form.birth_date = Some(adapter.add_calendar_days(&adapter.today(), 1));
        let err = form.to_draft(&adapter).unwrap_err();
        assert!(matches!(err, UserValidationError::BirthDateOutOfRange(_)));
    }

    #[test]
    fn to_draft_requires_birth_date() {
        let adapter = JalaliDateAdapter::new();
        let mut form = filled_form(&adapter);
        form.birth_date = None;
        assert_eq!(
            form.to_draft(&adapter).unwrap_err(),
            UserValidationError::Required("birthDate")
        );
    }

    #[test]
    fn stored_dates_round_trip_and_garbage_falls_back_to_today() {
        let adapter = JalaliDateAdapter::new();
        let date = from_jalali("1399/12/30", &adapter);
        assert_eq!(to_jalali(&date, &adapter), "1399/12/30");

        let fallback = from_jalali("garbage", &adapter);
        assert!(adapter.same_date(Some(&fallback), Some(&adapter.today())));
    }

    #[test]
    fn bounds_span_one_hundred_fifty_years() {
        let adapter = JalaliDateAdapter::new();
        let (min, max) = birth_date_bounds(&adapter);
        assert_eq!(adapter.get_year(&max) - adapter.get_year(&min), 150);
    }
}
