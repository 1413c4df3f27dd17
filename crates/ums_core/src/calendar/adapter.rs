//! Date-picker adapter contract and its Jalali implementation.
//!
//! # Responsibility
//! - Expose every calendar operation a generic month-grid widget needs, so
//!   the widget carries no calendar-specific logic.
//! - Keep construction errors (programming/data errors) separate from
//!   user-input failures, which degrade to `None` or an empty string.
//!
//! # Invariants
//! - Months are 0-based across the whole contract.
//! - Weekdays are numbered 0 = Sunday .. 6 = Saturday.
//! - The Jalali adapter is pinned to the `fa` locale.

use super::date::CalendarDate;
use super::format::{
    format_date, format_iso8601, parse_strict, DateFormats, ParseFormat,
    JALALI_CANONICAL_FORMAT, JALALI_DATE_FORMATS, JALALI_LENIENT_FORMAT,
};
use super::gregorian::GregorianDate;
use super::leap;
use super::names::{self, NameStyle};
use chrono::NaiveDate;
use log::debug;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

/// Locale the Jalali adapter always reports.
pub const JALALI_LOCALE: &str = "fa";

/// Saturday, the first day of the Iranian week.
pub const FIRST_DAY_OF_WEEK: u32 = 6;

/// Formats tried by [`DateAdapter::deserialize`] for string input.
pub const DESERIALIZE_FORMATS: [ParseFormat<'static>; 3] = [
    ParseFormat::Pattern(JALALI_CANONICAL_FORMAT),
    ParseFormat::Pattern(JALALI_LENIENT_FORMAT),
    ParseFormat::Iso8601,
];

/// Construction error for explicit `(year, month, day)` dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateError {
    /// Month index outside `0..=11`.
    InvalidMonth(i32),
    /// Day of month below 1.
    InvalidDay(i32),
    /// The triple does not exist in the target calendar year.
    InvalidDate { year: i32, month: i32, day: i32 },
}

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(month) => write!(
                f,
                "invalid month index `{month}`; month index has to be between 0 and 11"
            ),
            Self::InvalidDay(day) => {
                write!(f, "invalid date `{day}`; date has to be greater than 0")
            }
            Self::InvalidDate { year, month, day } => write!(
                f,
                "invalid date `{day}` for month with index `{month}` in year {year}"
            ),
        }
    }
}

impl Error for DateError {}

/// Input accepted by [`DateAdapter::deserialize`].
#[derive(Debug, Clone, Copy)]
pub enum DateInput<'a, D> {
    /// Absent value.
    Null,
    /// An existing date instance.
    Date(D),
    /// Serialized text.
    Text(&'a str),
    /// Any other JSON-shaped value, e.g. from a stored form model.
    Json(&'a serde_json::Value),
}

impl<'a, D> From<&'a str> for DateInput<'a, D> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a, D> From<Option<&'a str>> for DateInput<'a, D> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

/// Calendar operations required by a generic date-picker widget.
pub trait DateAdapter {
    type Date: Copy;

    fn today(&self) -> Self::Date;
    fn create_date(&self, year: i32, month: i32, day: i32) -> Result<Self::Date, DateError>;
    fn parse(&self, value: &str, formats: &[ParseFormat<'_>]) -> Option<Self::Date>;
    fn format(&self, date: &Self::Date, display_format: &str) -> String;

    fn get_year(&self, date: &Self::Date) -> i32;
    fn get_month(&self, date: &Self::Date) -> u32;
    fn get_date(&self, date: &Self::Date) -> u32;
    fn get_day_of_week(&self, date: &Self::Date) -> u32;
    fn get_first_day_of_week(&self) -> u32;
    fn get_num_days_in_month(&self, date: &Self::Date) -> u32;
    fn get_month_names(&self, style: NameStyle) -> Vec<String>;
    fn get_day_of_week_names(&self, style: NameStyle) -> Vec<String>;
    fn get_date_names(&self) -> Vec<String>;
    fn get_year_name(&self, date: &Self::Date) -> String;

    fn add_calendar_years(&self, date: &Self::Date, years: i64) -> Self::Date;
    fn add_calendar_months(&self, date: &Self::Date, months: i64) -> Self::Date;
    fn add_calendar_days(&self, date: &Self::Date, days: i64) -> Self::Date;

    fn to_iso8601(&self, date: &Self::Date) -> String;
    fn deserialize(&self, value: DateInput<'_, Self::Date>) -> Option<Self::Date>;

    fn is_valid(&self, date: &Self::Date) -> bool;
    fn invalid(&self) -> Self::Date;
    fn is_date_instance(&self, value: &dyn std::any::Any) -> bool;

    fn clone_date(&self, date: &Self::Date) -> Self::Date {
        *date
    }

    /// Orders two dates by day; `None` when either side is invalid.
    fn compare_date(&self, first: &Self::Date, second: &Self::Date) -> Option<Ordering>;

    fn same_date(&self, first: Option<&Self::Date>, second: Option<&Self::Date>) -> bool {
        match (first, second) {
            (Some(first), Some(second)) => {
                let first_valid = self.is_valid(first);
                let second_valid = self.is_valid(second);
                if first_valid && second_valid {
                    self.compare_date(first, second) == Some(Ordering::Equal)
                } else {
                    first_valid == second_valid
                }
            }
            (None, None) => true,
            _ => false,
        }
    }

    /// Clamps `date` into `[min, max]`; missing bounds are open.
    fn clamp_date(
        &self,
        date: &Self::Date,
        min: Option<&Self::Date>,
        max: Option<&Self::Date>,
    ) -> Self::Date {
        if let Some(min) = min {
            if self.compare_date(date, min) == Some(Ordering::Less) {
                return *min;
            }
        }
        if let Some(max) = max {
            if self.compare_date(date, max) == Some(Ordering::Greater) {
                return *max;
            }
        }
        *date
    }
}

/// Jalali (Persian solar) calendar adapter.
#[derive(Debug, Clone)]
pub struct JalaliDateAdapter<G: GregorianDate = NaiveDate> {
    formats: DateFormats,
    _gregorian: PhantomData<G>,
}

impl<G: GregorianDate> Default for JalaliDateAdapter<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GregorianDate> JalaliDateAdapter<G> {
    pub fn new() -> Self {
        Self::with_formats(JALALI_DATE_FORMATS)
    }

    pub fn with_formats(formats: DateFormats) -> Self {
        Self {
            formats,
            _gregorian: PhantomData,
        }
    }

    /// Picker format configuration.
    pub fn formats(&self) -> &DateFormats {
        &self.formats
    }

    pub fn locale(&self) -> &'static str {
        JALALI_LOCALE
    }

    /// Accepts any locale request but stays on `fa`.
    pub fn set_locale(&mut self, locale: &str) {
        if locale != JALALI_LOCALE {
            debug!(
                "event=locale_pinned module=calendar status=ok requested={} active={}",
                locale, JALALI_LOCALE
            );
        }
    }

    /// Whether `year` is leap under the arithmetic grand-cycle rule.
    pub fn is_leap_year(&self, year: i32) -> bool {
        leap::is_leap_year(year)
    }

    /// Parses with the configured picker input format, then the canonical one.
    pub fn parse_input(&self, value: &str) -> Option<CalendarDate<G>> {
        let configured = self.formats.parse.date_input.as_ref();
        self.parse(
            value,
            &[
                ParseFormat::Pattern(configured),
                ParseFormat::Pattern(JALALI_CANONICAL_FORMAT),
            ],
        )
    }

    /// Renders the month/year label shown above the grid.
    pub fn month_year_label(&self, date: &CalendarDate<G>) -> String {
        self.format(date, self.formats.display.month_year_label.as_ref())
    }
}

impl<G: GregorianDate> DateAdapter for JalaliDateAdapter<G> {
    type Date = CalendarDate<G>;

    fn today(&self) -> Self::Date {
        CalendarDate::today()
    }

    fn create_date(&self, year: i32, month: i32, day: i32) -> Result<Self::Date, DateError> {
        if !(0..=11).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        if day < 1 {
            return Err(DateError::InvalidDay(day));
        }

        CalendarDate::from_jalali(year, month as u32, day as u32)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    fn parse(&self, value: &str, formats: &[ParseFormat<'_>]) -> Option<Self::Date> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        parse_strict(trimmed, formats)
    }

    fn format(&self, date: &Self::Date, display_format: &str) -> String {
        format_date(date, display_format)
    }

    fn get_year(&self, date: &Self::Date) -> i32 {
        date.jalali().map_or(0, |jalali| jalali.year)
    }

    fn get_month(&self, date: &Self::Date) -> u32 {
        date.jalali().map_or(0, |jalali| jalali.month)
    }

    fn get_date(&self, date: &Self::Date) -> u32 {
        date.jalali().map_or(0, |jalali| jalali.day)
    }

    fn get_day_of_week(&self, date: &Self::Date) -> u32 {
        date.weekday().unwrap_or(0)
    }

    fn get_first_day_of_week(&self) -> u32 {
        FIRST_DAY_OF_WEEK
    }

    fn get_num_days_in_month(&self, date: &Self::Date) -> u32 {
        date.jalali()
            .and_then(|jalali| leap::days_in_month(jalali.year, jalali.month))
            .unwrap_or(0)
    }

    fn get_month_names(&self, style: NameStyle) -> Vec<String> {
        names::month_names(style)
            .iter()
            .map(|name| (*name).to_string())
            .collect()
    }

    fn get_day_of_week_names(&self, style: NameStyle) -> Vec<String> {
        names::weekday_names(style)
            .iter()
            .map(|name| (*name).to_string())
            .collect()
    }

    fn get_date_names(&self) -> Vec<String> {
        (1..=31).map(|day: u32| day.to_string()).collect()
    }

    fn get_year_name(&self, date: &Self::Date) -> String {
        self.get_year(date).to_string()
    }

    fn add_calendar_years(&self, date: &Self::Date, years: i64) -> Self::Date {
        date.add_jalali_years(years)
    }

    fn add_calendar_months(&self, date: &Self::Date, months: i64) -> Self::Date {
        date.add_jalali_months(months)
    }

    fn add_calendar_days(&self, date: &Self::Date, days: i64) -> Self::Date {
        date.add_days(days)
    }

    fn to_iso8601(&self, date: &Self::Date) -> String {
        format_iso8601(date)
    }

    fn deserialize(&self, value: DateInput<'_, Self::Date>) -> Option<Self::Date> {
        match value {
            DateInput::Null => None,
            DateInput::Date(date) => Some(date),
            DateInput::Text(text) if text.is_empty() => None,
            DateInput::Text(text) => parse_strict(text, &DESERIALIZE_FORMATS),
            DateInput::Json(serde_json::Value::Null) => None,
            DateInput::Json(serde_json::Value::String(text)) => {
                self.deserialize(DateInput::Text(text.as_str()))
            }
            DateInput::Json(other) => {
                debug!(
                    "event=date_deserialize module=calendar status=fallback kind={}",
                    json_kind(other)
                );
                Some(self.invalid())
            }
        }
    }

    fn is_valid(&self, date: &Self::Date) -> bool {
        date.is_valid()
    }

    fn invalid(&self) -> Self::Date {
        CalendarDate::invalid()
    }

    fn is_date_instance(&self, value: &dyn std::any::Any) -> bool {
        value.is::<CalendarDate<G>>()
    }

    fn compare_date(&self, first: &Self::Date, second: &Self::Date) -> Option<Ordering> {
        first.compare(second)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
