//! Jalali calendar support for the birth-date picker.
//!
//! # Responsibility
//! - Convert between the Gregorian primitive and the Jalali calendar.
//! - Provide the date-picker adapter contract and its Jalali implementation.
//!
//! # Invariants
//! - Calendar operations are pure except `today`, which reads the clock.
//! - Month grid metadata uses the arithmetic leap rule in [`leap`]; date
//!   existence uses the observational table in [`conversion`].

pub mod adapter;
pub mod conversion;
pub mod date;
pub mod format;
pub mod gregorian;
pub mod leap;
pub mod names;

pub use adapter::{
    DateAdapter, DateError, DateInput, JalaliDateAdapter, DESERIALIZE_FORMATS, FIRST_DAY_OF_WEEK,
    JALALI_LOCALE,
};
pub use date::{CalendarDate, JalaliDate};
pub use format::{
    DateFormats, DisplayFormats, ParseFormat, ParseFormats, JALALI_CANONICAL_FORMAT,
    JALALI_DATE_FORMATS, JALALI_LENIENT_FORMAT, JALALI_MONTH_YEAR_FORMAT,
};
pub use gregorian::GregorianDate;
pub use leap::is_leap_year;
pub use names::NameStyle;
