//! Core domain logic for the user-management app.
//! This crate owns the Jalali calendar adapter and the user record invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use calendar::{
    is_leap_year, CalendarDate, DateAdapter, DateError, DateFormats, DateInput, GregorianDate,
    JalaliDate, JalaliDateAdapter, NameStyle, ParseFormat, JALALI_CANONICAL_FORMAT,
    JALALI_DATE_FORMATS, JALALI_LENIENT_FORMAT, JALALI_MONTH_YEAR_FORMAT,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::user::{
    User, UserDraft, UserId, UserValidationError, DEFAULT_AVATAR, EDUCATION_OPTIONS,
};
pub use repo::user_repo::{
    KvUserRepository, RepoError, RepoResult, UserRepository, USERS_STORAGE_KEY,
};
pub use service::user_form::{birth_date_bounds, FormMode, UserForm};
pub use service::user_service::{
    delete_confirmation, ConfirmPrompt, UserService, UserServiceError,
};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
