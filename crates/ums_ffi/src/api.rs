//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the Jalali date-picker operations and user CRUD to Dart via FRB.
//! - Keep error semantics simple: envelopes carry `ok` plus a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Dates cross the boundary as `jYYYY/jMM/jDD` strings; months in
//!   envelopes are 0-based like the adapter contract.

use log::warn;
use ums_core::db::open_db;
use ums_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DateAdapter, DateInput, JalaliDateAdapter, KvUserRepository, NameStyle, ParseFormat,
    SqliteKvStore, User, UserDraft, UserService, UserServiceError, JALALI_CANONICAL_FORMAT,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const USERS_DB_FILE_NAME: &str = "ums_users.sqlite3";
static USERS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Today's local date as `jYYYY/jMM/jDD`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_today() -> String {
    let adapter = adapter();
    adapter.format(&adapter.today(), JALALI_CANONICAL_FORMAT)
}

/// Re-renders a stored Jalali date with `display_format`.
///
/// Accepts canonical, padding-free and ISO-8601 input. Returns an empty
/// string when `value` is not a date.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_format(value: String, display_format: String) -> String {
    let adapter = adapter();
    adapter
        .deserialize(DateInput::Text(value.as_str()))
        .map(|date| adapter.format(&date, display_format.as_str()))
        .unwrap_or_default()
}

/// Parsed date returned by [`calendar_parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarParseResponse {
    pub ok: bool,
    /// Canonical `jYYYY/jMM/jDD` rendering.
    pub jalali: String,
    /// `YYYY-MM-DD` Gregorian rendering.
    pub iso8601: String,
    pub message: String,
}

/// Strictly parses `value` with `format`.
///
/// An empty `format` uses the picker input formats: `jYYYY/jM/jD`, then
/// `jYYYY/jMM/jDD`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_parse(value: String, format: String) -> CalendarParseResponse {
    let adapter = adapter();
    let (parsed, expected) = if format.trim().is_empty() {
        (
            adapter.parse_input(value.as_str()),
            adapter.formats().parse.date_input.to_string(),
        )
    } else {
        (
            adapter.parse(value.as_str(), &[ParseFormat::Pattern(format.as_str())]),
            format.clone(),
        )
    };

    match parsed {
        Some(date) => CalendarParseResponse {
            ok: true,
            jalali: adapter.format(&date, JALALI_CANONICAL_FORMAT),
            iso8601: adapter.to_iso8601(&date),
            message: String::new(),
        },
        None => CalendarParseResponse {
            ok: false,
            jalali: String::new(),
            iso8601: String::new(),
            message: format!("`{value}` does not match `{expected}`"),
        },
    }
}

/// Everything a month grid needs to render one Jalali month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGridResponse {
    pub ok: bool,
    /// Month/year header, e.g. `فروردین 1403`.
    pub label: String,
    /// Grid length from the arithmetic leap rule; see [`calendar_month_grid`].
    pub days_in_month: u32,
    /// Empty cells before day 1 in a Saturday-first week.
    pub leading_blanks: u32,
    /// Narrow weekday headers starting at Saturday.
    pub weekday_headers: Vec<String>,
    pub message: String,
}

/// Month-grid metadata for Jalali `year` and 0-based `month`.
///
/// `days_in_month` follows the arithmetic 2820-year leap rule, while dates
/// themselves follow the observational calendar. The two disagree on Esfand
/// in some years: Esfand 1404 reports 30 cells but 30 Esfand 1404 does not
/// exist, and Esfand 1403 reports 29 cells although 30 Esfand 1403 does.
/// Callers must treat a failing `create_date` or `calendar_parse` for the
/// last Esfand cell as a disabled day rather than an error.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month_grid(year: i32, month: i32) -> MonthGridResponse {
    let adapter = adapter();
    let first = match adapter.create_date(year, month, 1) {
        Ok(date) => date,
        Err(err) => {
            return MonthGridResponse {
                ok: false,
                label: String::new(),
                days_in_month: 0,
                leading_blanks: 0,
                weekday_headers: Vec::new(),
                message: err.to_string(),
            };
        }
    };

    let first_day = adapter.get_first_day_of_week();
    let names = adapter.get_day_of_week_names(NameStyle::Narrow);
    let weekday_headers = (0..7)
        .map(|offset| names[((first_day + offset) % 7) as usize].clone())
        .collect();

    MonthGridResponse {
        ok: true,
        label: adapter.month_year_label(&first),
        days_in_month: adapter.get_num_days_in_month(&first),
        leading_blanks: (adapter.get_day_of_week(&first) + 7 - first_day) % 7,
        weekday_headers,
        message: String::new(),
    }
}

/// User record as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserItem {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub education: String,
    pub national_id: String,
    /// Jalali `jYYYY/jMM/jDD`.
    pub birth_date: String,
    /// Data URL or asset path; default avatar when none was uploaded.
    pub avatar: String,
}

/// Create/update payload from the user form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub education: String,
    pub national_id: String,
    pub birth_date: String,
    pub profile_photo: Option<String>,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersListResponse {
    pub items: Vec<UserItem>,
    pub message: String,
}

/// Generic action response envelope for user mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActionResponse {
    pub ok: bool,
    pub user_id: Option<String>,
    pub message: String,
}

impl UserActionResponse {
    fn success(message: impl Into<String>, user_id: String) -> Self {
        Self {
            ok: true,
            user_id: Some(user_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            user_id: None,
            message: message.into(),
        }
    }
}

/// Lists stored users, optionally filtered by a search query.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn users_list(query: Option<String>) -> UsersListResponse {
    let query = query.unwrap_or_default();
    match with_user_service(|service| service.filter_users(&query).map_err(Into::into)) {
        Ok(users) => {
            let items = users.iter().map(to_user_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No users.".to_string()
            } else {
                format!("Found {} user(s).", items.len())
            };
            UsersListResponse { items, message }
        }
        Err(err) => UsersListResponse {
            items: Vec::new(),
            message: format!("users_list failed: {err}"),
        },
    }
}

/// Validates and stores a new user.
///
/// # FFI contract
/// - Rejects a national id that is already registered.
/// - Returns the generated id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn users_create(input: UserInput) -> UserActionResponse {
    let draft = to_draft(input);
    let result = with_user_service(|service| {
        if service.national_id_exists(&draft.national_id, None)? {
            return Err(UserServiceError::NationalIdNotUnique(
                draft.national_id.clone(),
            ));
        }
        service.add_user(draft)
    });

    match result {
        Ok(user) => UserActionResponse::success("User created.", user.id),
        Err(err) => action_failure("users_create", err),
    }
}

/// Replaces the user stored under `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn users_update(id: String, input: UserInput) -> UserActionResponse {
    let draft = to_draft(input);
    let result = with_user_service(|service| {
        draft.validate()?;
        if service.national_id_exists(&draft.national_id, Some(id.as_str()))? {
            return Err(UserServiceError::NationalIdNotUnique(
                draft.national_id.clone(),
            ));
        }
        service.update_user(&id, draft.into_user_with_id(id.clone()))
    });

    match result {
        Ok(true) => UserActionResponse::success("User updated.", id),
        Ok(false) => UserActionResponse::failure(format!("users_update failed: no user `{id}`")),
        Err(err) => action_failure("users_update", err),
    }
}

/// Deletes the user stored under `id`. Unknown ids succeed.
#[flutter_rust_bridge::frb(sync)]
pub fn users_delete(id: String) -> UserActionResponse {
    match with_user_service(|service| service.delete_user(&id).map_err(Into::into)) {
        Ok(()) => UserActionResponse::success("User deleted.", id),
        Err(err) => action_failure("users_delete", err),
    }
}

fn adapter() -> JalaliDateAdapter {
    JalaliDateAdapter::new()
}

fn resolve_users_db_path() -> PathBuf {
    USERS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("UMS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(USERS_DB_FILE_NAME)
        })
        .clone()
}

fn with_user_service<T>(
    f: impl FnOnce(
        &UserService<KvUserRepository<SqliteKvStore<'_>>>,
    ) -> Result<T, UserServiceError>,
) -> Result<T, String> {
    let db_path = resolve_users_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("users DB open failed: {err}"))?;
    let service = UserService::new(KvUserRepository::new(SqliteKvStore::new(&conn)));
    f(&service).map_err(|err| err.to_string())
}

fn action_failure(op: &str, err: String) -> UserActionResponse {
    warn!("event=ffi_call module=ffi status=error op={op}");
    UserActionResponse::failure(format!("{op} failed: {err}"))
}

fn to_draft(input: UserInput) -> UserDraft {
    UserDraft {
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        age: input.age,
        education: input.education,
        national_id: input.national_id.trim().to_string(),
        birth_date: input.birth_date.trim().to_string(),
        profile_photo: input.profile_photo.filter(|photo| !photo.trim().is_empty()),
    }
}

fn to_user_item(user: &User) -> UserItem {
    UserItem {
        id: user.id.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        age: user.age,
        education: user.education.clone(),
        national_id: user.national_id.clone(),
        birth_date: user.birth_date.clone(),
        avatar: user.avatar().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_format, calendar_month_grid, calendar_parse, calendar_today, core_version,
        init_logging, ping, users_create, users_delete, users_list, users_update, UserInput,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn calendar_today_is_canonical() {
        let today = calendar_today();
        assert_eq!(today.len(), 10);
        assert_eq!(today.as_bytes()[4], b'/');
        assert_eq!(today.as_bytes()[7], b'/');
    }

    #[test]
    fn calendar_format_accepts_lenient_input_and_degrades_to_empty() {
        assert_eq!(
            calendar_format("1403/1/1".to_string(), "jMMMM jYYYY".to_string()),
            "فروردین 1403"
        );
        assert_eq!(
            calendar_format("nope".to_string(), "jYYYY".to_string()),
            ""
        );
    }

    #[test]
    fn calendar_parse_is_strict() {
        let parsed = calendar_parse("1403/12/30".to_string(), String::new());
        assert!(parsed.ok, "{}", parsed.message);
        assert_eq!(parsed.iso8601, "2025-03-20");

        let rejected = calendar_parse("1403/1/1".to_string(), "jYYYY/jMM/jDD".to_string());
        assert!(!rejected.ok);
        assert!(rejected.jalali.is_empty());
    }

    #[test]
    fn calendar_parse_without_format_uses_picker_input_formats() {
        let lenient = calendar_parse("1403/1/5".to_string(), String::new());
        assert!(lenient.ok, "{}", lenient.message);
        assert_eq!(lenient.jalali, "1403/01/05");
        assert_eq!(lenient.iso8601, "2024-03-24");

        let rejected = calendar_parse("2024-03-24".to_string(), "  ".to_string());
        assert!(!rejected.ok);
        assert!(rejected.message.contains("jYYYY/jM/jD"));
    }

    #[test]
    fn esfand_grid_length_can_differ_from_existing_days() {
        let esfand_1404 = calendar_month_grid(1404, 11);
        assert!(esfand_1404.ok, "{}", esfand_1404.message);
        assert_eq!(esfand_1404.days_in_month, 30);
        assert!(!calendar_parse("1404/12/30".to_string(), String::new()).ok);

        let esfand_1403 = calendar_month_grid(1403, 11);
        assert_eq!(esfand_1403.days_in_month, 29);
        assert!(calendar_parse("1403/12/30".to_string(), String::new()).ok);
    }

    #[test]
    fn month_grid_starts_on_saturday() {
        // 1 Farvardin 1403 was a Wednesday: Sat, Sun, Mon, Tue come first.
        let grid = calendar_month_grid(1403, 0);
        assert!(grid.ok, "{}", grid.message);
        assert_eq!(grid.label, "فروردین 1403");
        assert_eq!(grid.days_in_month, 31);
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.weekday_headers.len(), 7);
        assert_eq!(grid.weekday_headers[0], "ش");

        let invalid = calendar_month_grid(1403, 12);
        assert!(!invalid.ok);
        assert!(!invalid.message.is_empty());
    }

    #[test]
    fn users_crud_flow_round_trips_through_sqlite() {
        let national_id = unique_national_id();
        let input = UserInput {
            first_name: " زهرا ".to_string(),
            last_name: "نوری".to_string(),
            age: 27,
            education: "کارشناسی".to_string(),
            national_id: national_id.clone(),
            birth_date: "1377/08/21".to_string(),
            profile_photo: None,
        };

        let created = users_create(input.clone());
        assert!(created.ok, "{}", created.message);
        let user_id = created.user_id.expect("create should return user_id");

        let duplicate = users_create(input.clone());
        assert!(!duplicate.ok);

        let listed = users_list(Some(national_id.clone()));
        let item = listed
            .items
            .iter()
            .find(|item| item.id == user_id)
            .expect("created user should be listed");
        assert_eq!(item.first_name, "زهرا");
        assert_eq!(item.avatar, "assets/default-avatar.png");

        let updated = users_update(
            user_id.clone(),
            UserInput {
                age: 28,
                ..input.clone()
            },
        );
        assert!(updated.ok, "{}", updated.message);

        let missing = users_update("missing-id".to_string(), input);
        assert!(!missing.ok);

        let deleted = users_delete(user_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        let listed = users_list(Some(national_id));
        assert!(listed.items.iter().all(|item| item.id != user_id));
    }

    #[test]
    fn users_create_rejects_invalid_input() {
        let response = users_create(UserInput {
            first_name: String::new(),
            last_name: "نوری".to_string(),
            age: 27,
            education: "کارشناسی".to_string(),
            national_id: "123".to_string(),
            birth_date: "1377/08/21".to_string(),
            profile_photo: None,
        });
        assert!(!response.ok);
        assert!(response.user_id.is_none());
    }

    fn unique_national_id() -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{:010}", nanos % 10_000_000_000)
    }
}
