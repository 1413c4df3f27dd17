//! Persian month and weekday names.

use serde::{Deserialize, Serialize};

/// Width requested by the date picker for month/weekday labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    Long,
    Short,
    Narrow,
}

/// Jalali month names, Farvardin first.
pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Full weekday names, Sunday first.
pub const WEEKDAY_NAMES_LONG: [&str; 7] = [
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنج‌شنبه",
    "جمعه",
    "شنبه",
];

/// One-letter weekday abbreviations, Sunday first.
pub const WEEKDAY_NAMES_NARROW: [&str; 7] = ["ی", "د", "س", "چ", "پ", "ج", "ش"];

/// Month names for `style`. Every style uses the full names.
pub fn month_names(_style: NameStyle) -> [&'static str; 12] {
    MONTH_NAMES
}

/// Weekday names for `style`, Sunday first.
pub fn weekday_names(style: NameStyle) -> [&'static str; 7] {
    match style {
        NameStyle::Long => WEEKDAY_NAMES_LONG,
        NameStyle::Short | NameStyle::Narrow => WEEKDAY_NAMES_NARROW,
    }
}

/// Returns the 0-based month index whose name is exactly `name`.
pub fn month_index(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|candidate| *candidate == name)
        .map(|index| index as u32)
}
