//! Format-string tokenizer, formatter and strict parser.
//!
//! # Responsibility
//! - Render `CalendarDate` values through moment-style format strings.
//! - Parse user input strictly against one or more candidate formats.
//!
//! # Invariants
//! - Formatting an invalid date yields an empty string.
//! - Parsing never panics; any mismatch yields `None`.
//! - A format mixing Jalali and Gregorian date fields never parses.

use super::date::CalendarDate;
use super::gregorian::GregorianDate;
use super::names::{self, MONTH_NAMES, WEEKDAY_NAMES_LONG, WEEKDAY_NAMES_NARROW};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Write;

/// Canonical zero-padded Jalali format used for display and storage.
pub const JALALI_CANONICAL_FORMAT: &str = "jYYYY/jMM/jDD";
/// Lenient Jalali input format.
pub const JALALI_LENIENT_FORMAT: &str = "jYYYY/jM/jD";
/// Month/year label shown above the month grid.
pub const JALALI_MONTH_YEAR_FORMAT: &str = "jMMMM jYYYY";

static ISO_8601_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<y>\d{4})(?:-(?P<m>\d{2})-(?P<d>\d{2})|(?P<bm>\d{2})(?P<bd>\d{2}))(?:[T ](?P<hh>\d{2})(?::?(?P<mi>\d{2})(?::?(?P<ss>\d{2})(?:[.,]\d+)?)?)?(?:Z|[+-]\d{2}(?::?\d{2})?)?)?$",
    )
    .expect("valid iso-8601 regex")
});

/// Candidate format accepted by the strict parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFormat<'a> {
    /// Tokenized format string such as `jYYYY/jMM/jDD`.
    Pattern(&'a str),
    /// ISO-8601 calendar date, optionally followed by a time and offset.
    Iso8601,
}

impl<'a> From<&'a str> for ParseFormat<'a> {
    fn from(value: &'a str) -> Self {
        Self::Pattern(value)
    }
}

/// Parse formats consulted by the picker text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseFormats {
    pub date_input: Cow<'static, str>,
}

/// Display formats consulted by the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFormats {
    pub date_input: Cow<'static, str>,
    pub month_year_label: Cow<'static, str>,
    pub date_a11y_label: Cow<'static, str>,
    pub month_year_a11y_label: Cow<'static, str>,
}

/// Picker format configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormats {
    pub parse: ParseFormats,
    pub display: DisplayFormats,
}

/// Jalali picker formats.
pub const JALALI_DATE_FORMATS: DateFormats = DateFormats {
    parse: ParseFormats {
        date_input: Cow::Borrowed(JALALI_LENIENT_FORMAT),
    },
    display: DisplayFormats {
        date_input: Cow::Borrowed(JALALI_CANONICAL_FORMAT),
        month_year_label: Cow::Borrowed(JALALI_MONTH_YEAR_FORMAT),
        date_a11y_label: Cow::Borrowed(JALALI_CANONICAL_FORMAT),
        month_year_a11y_label: Cow::Borrowed(JALALI_MONTH_YEAR_FORMAT),
    },
};

impl Default for DateFormats {
    fn default() -> Self {
        JALALI_DATE_FORMATS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    JalaliYear,
    JalaliYearShort,
    JalaliMonthName,
    JalaliMonthPadded,
    JalaliMonth,
    JalaliDayPadded,
    JalaliDay,
    Year,
    MonthPadded,
    Month,
    DayPadded,
    Day,
    WeekdayLong,
    WeekdayShort,
    WeekdayNumber,
    Literal(&'a str),
}

// Longest spellings first so `jMMMM` wins over `jMM` and `jM`.
const TOKEN_TABLE: &[(&str, Token<'static>)] = &[
    ("jYYYY", Token::JalaliYear),
    ("jMMMM", Token::JalaliMonthName),
    ("YYYY", Token::Year),
    ("dddd", Token::WeekdayLong),
    ("jYY", Token::JalaliYearShort),
    ("jMM", Token::JalaliMonthPadded),
    ("jDD", Token::JalaliDayPadded),
    ("jM", Token::JalaliMonth),
    ("jD", Token::JalaliDay),
    ("MM", Token::MonthPadded),
    ("DD", Token::DayPadded),
    ("dd", Token::WeekdayShort),
    ("M", Token::Month),
    ("D", Token::Day),
    ("d", Token::WeekdayNumber),
];

fn tokenize(format: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = format;

    'outer: while let Some(first) = rest.chars().next() {
        if first == '[' {
            if let Some(end) = rest.find(']') {
                tokens.push(Token::Literal(&rest[1..end]));
                rest = &rest[end + 1..];
                continue;
            }
        }

        for (spelling, token) in TOKEN_TABLE {
            if let Some(after) = rest.strip_prefix(spelling) {
                tokens.push(*token);
                rest = after;
                continue 'outer;
            }
        }

        let width = first.len_utf8();
        tokens.push(Token::Literal(&rest[..width]));
        rest = &rest[width..];
    }

    tokens
}

/// Renders `date` with `pattern`. Invalid dates render as an empty string.
pub fn format_date<G: GregorianDate>(date: &CalendarDate<G>, pattern: &str) -> String {
    let (Some(gregorian), Some(jalali)) = (date.gregorian(), date.jalali()) else {
        return String::new();
    };
    let weekday = gregorian.weekday() as usize;

    let mut out = String::with_capacity(pattern.len() + 8);
    for token in tokenize(pattern) {
        // Writing into a String cannot fail.
        let _ = match token {
            Token::JalaliYear => write!(out, "{:04}", jalali.year),
            Token::JalaliYearShort => write!(out, "{:02}", jalali.year.rem_euclid(100)),
            Token::JalaliMonthName => write!(out, "{}", MONTH_NAMES[jalali.month as usize]),
            Token::JalaliMonthPadded => write!(out, "{:02}", jalali.month + 1),
            Token::JalaliMonth => write!(out, "{}", jalali.month + 1),
            Token::JalaliDayPadded => write!(out, "{:02}", jalali.day),
            Token::JalaliDay => write!(out, "{}", jalali.day),
            Token::Year => write!(out, "{:04}", gregorian.year()),
            Token::MonthPadded => write!(out, "{:02}", gregorian.month()),
            Token::Month => write!(out, "{}", gregorian.month()),
            Token::DayPadded => write!(out, "{:02}", gregorian.day()),
            Token::Day => write!(out, "{}", gregorian.day()),
            Token::WeekdayLong => write!(out, "{}", WEEKDAY_NAMES_LONG[weekday]),
            Token::WeekdayShort => write!(out, "{}", WEEKDAY_NAMES_NARROW[weekday]),
            Token::WeekdayNumber => write!(out, "{weekday}"),
            Token::Literal(text) => write!(out, "{text}"),
        };
    }
    out
}

/// Renders the Gregorian side of `date` as an ISO-8601 calendar date.
pub fn format_iso8601<G: GregorianDate>(date: &CalendarDate<G>) -> String {
    match date.gregorian() {
        Some(gregorian) => format!(
            "{:04}-{:02}-{:02}",
            gregorian.year(),
            gregorian.month(),
            gregorian.day()
        ),
        None => String::new(),
    }
}

/// Strictly parses `value` against each candidate in order.
///
/// An empty candidate list falls back to [`JALALI_CANONICAL_FORMAT`].
pub fn parse_strict<G: GregorianDate>(
    value: &str,
    formats: &[ParseFormat<'_>],
) -> Option<CalendarDate<G>> {
    if formats.is_empty() {
        return parse_one(value, ParseFormat::Pattern(JALALI_CANONICAL_FORMAT));
    }
    formats
        .iter()
        .find_map(|format| parse_one::<G>(value, *format))
}

fn parse_one<G: GregorianDate>(value: &str, format: ParseFormat<'_>) -> Option<CalendarDate<G>> {
    match format {
        ParseFormat::Pattern(pattern) => parse_pattern(value, pattern),
        ParseFormat::Iso8601 => parse_iso8601(value),
    }
}

#[derive(Debug, Default)]
struct Fields {
    jalali_year: Option<i32>,
    jalali_month: Option<u32>,
    jalali_day: Option<u32>,
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

fn parse_pattern<G: GregorianDate>(value: &str, pattern: &str) -> Option<CalendarDate<G>> {
    let mut fields = Fields::default();
    let mut rest = value;

    for token in tokenize(pattern) {
        rest = match token {
            Token::JalaliYear => take_number(rest, 4, 4, |n| fields.jalali_year = Some(n as i32))?,
            Token::JalaliMonthPadded => {
                take_number(rest, 2, 2, |n| fields.jalali_month = Some(n))?
            }
            Token::JalaliMonth => take_number(rest, 1, 2, |n| fields.jalali_month = Some(n))?,
            Token::JalaliDayPadded => take_number(rest, 2, 2, |n| fields.jalali_day = Some(n))?,
            Token::JalaliDay => take_number(rest, 1, 2, |n| fields.jalali_day = Some(n))?,
            Token::JalaliMonthName => {
                let (index, after) = MONTH_NAMES
                    .iter()
                    .filter_map(|name| rest.strip_prefix(name).map(|after| (*name, after)))
                    .max_by_key(|(name, _)| name.len())
                    .and_then(|(name, after)| Some((names::month_index(name)?, after)))?;
                fields.jalali_month = Some(index + 1);
                after
            }
            Token::Year => take_number(rest, 4, 4, |n| fields.year = Some(n as i32))?,
            Token::MonthPadded => take_number(rest, 2, 2, |n| fields.month = Some(n))?,
            Token::Month => take_number(rest, 1, 2, |n| fields.month = Some(n))?,
            Token::DayPadded => take_number(rest, 2, 2, |n| fields.day = Some(n))?,
            Token::Day => take_number(rest, 1, 2, |n| fields.day = Some(n))?,
            Token::Literal(text) => rest.strip_prefix(text)?,
            // Two-digit years and weekday names are ambiguous on input.
            Token::JalaliYearShort
            | Token::WeekdayLong
            | Token::WeekdayShort
            | Token::WeekdayNumber => return None,
        };
    }

    if !rest.is_empty() {
        return None;
    }

    let has_jalali = fields.jalali_year.is_some()
        || fields.jalali_month.is_some()
        || fields.jalali_day.is_some();
    let has_gregorian = fields.year.is_some() || fields.month.is_some() || fields.day.is_some();

    match (has_jalali, has_gregorian) {
        (true, false) => {
            let month = fields.jalali_month.unwrap_or(1);
            if month == 0 {
                return None;
            }
            CalendarDate::from_jalali(
                fields.jalali_year?,
                month - 1,
                fields.jalali_day.unwrap_or(1),
            )
        }
        (false, true) => CalendarDate::from_gregorian_ymd(
            fields.year?,
            fields.month.unwrap_or(1),
            fields.day.unwrap_or(1),
        ),
        _ => None,
    }
}

/// Consumes between `min` and `max` leading ASCII digits.
fn take_number<'v>(
    input: &'v str,
    min: usize,
    max: usize,
    mut store: impl FnMut(u32),
) -> Option<&'v str> {
    let digits = input
        .bytes()
        .take(max)
        .take_while(u8::is_ascii_digit)
        .count();
    if digits < min {
        return None;
    }
    let number = input[..digits].parse::<u32>().ok()?;
    store(number);
    Some(&input[digits..])
}

fn parse_iso8601<G: GregorianDate>(value: &str) -> Option<CalendarDate<G>> {
    let caps = ISO_8601_RE.captures(value)?;
    let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = caps.name("y")?.as_str().parse::<i32>().ok()?;
    let month = number("m").or_else(|| number("bm"))?;
    let day = number("d").or_else(|| number("bd"))?;

    let hour = number("hh").unwrap_or(0);
    let minute = number("mi").unwrap_or(0);
    let second = number("ss").unwrap_or(0);
    if hour > 24 || minute > 59 || second > 59 {
        return None;
    }

    CalendarDate::from_gregorian_ymd(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::{format_date, parse_strict, tokenize, ParseFormat, Token};
    use crate::calendar::date::CalendarDate;
    use chrono::NaiveDate;

    fn parse(value: &str, pattern: &str) -> Option<CalendarDate<NaiveDate>> {
        parse_strict(value, &[ParseFormat::Pattern(pattern)])
    }

    #[test]
    fn tokenizer_prefers_longest_spelling_and_keeps_literals() {
        assert_eq!(
            tokenize("jMMMM [jYYYY] jM"),
            vec![
                Token::JalaliMonthName,
                Token::Literal(" "),
                Token::Literal("jYYYY"),
                Token::Literal(" "),
                Token::JalaliMonth,
            ]
        );
    }

    #[test]
    fn formats_padded_and_named_fields() {
        let date = CalendarDate::<NaiveDate>::from_jalali(1403, 0, 5).unwrap();
        assert_eq!(format_date(&date, "jYYYY/jMM/jDD"), "1403/01/05");
        assert_eq!(format_date(&date, "jYYYY/jM/jD"), "1403/1/5");
        assert_eq!(format_date(&date, "jMMMM jYYYY"), "فروردین 1403");
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-03-24");
        // 2024-03-24 is a Sunday
        assert_eq!(format_date(&date, "dddd d"), "یکشنبه 0");
    }

    #[test]
    fn invalid_date_formats_as_empty_string() {
        let invalid = CalendarDate::<NaiveDate>::invalid();
        assert_eq!(format_date(&invalid, "jYYYY/jMM/jDD"), "");
    }

    #[test]
    fn strict_parse_requires_exact_widths() {
        assert!(parse("1403/01/05", "jYYYY/jMM/jDD").is_some());
        assert!(parse("1403/1/5", "jYYYY/jMM/jDD").is_none());
        assert!(parse("1403/1/5", "jYYYY/jM/jD").is_some());
        assert!(parse("1403/01/05", "jYYYY/jM/jD").is_some());
        assert!(parse("1403/01/05 ", "jYYYY/jMM/jDD").is_none());
        assert!(parse("1403-01-05", "jYYYY/jMM/jDD").is_none());
    }

    #[test]
    fn strict_parse_rejects_missing_days() {
        assert!(parse("1403/12/30", "jYYYY/jMM/jDD").is_some());
        assert!(parse("1404/12/30", "jYYYY/jMM/jDD").is_none());
        assert!(parse("1404/13/01", "jYYYY/jMM/jDD").is_none());
        assert!(parse("1404/00/01", "jYYYY/jMM/jDD").is_none());
    }

    #[test]
    fn strict_parse_reads_month_names() {
        let date = parse("اسفند 1403", "jMMMM jYYYY").unwrap();
        let jalali = date.jalali().unwrap();
        assert_eq!((jalali.year, jalali.month, jalali.day), (1403, 11, 1));
    }

    #[test]
    fn iso_fallback_accepts_dates_and_timestamps() {
        let formats = [ParseFormat::Iso8601];
        for input in [
            "2024-03-20",
            "20240320",
            "2024-03-20T10:15:00Z",
            "2024-03-20T10:15:00.123+03:30",
        ] {
            let date = parse_strict::<NaiveDate>(input, &formats)
                .unwrap_or_else(|| panic!("`{input}` should parse"));
            assert_eq!(date.jalali().unwrap().year, 1403);
        }
        assert!(parse_strict::<NaiveDate>("2024-02-30", &formats).is_none());
        assert!(parse_strict::<NaiveDate>("2024-03-20T25:00", &formats).is_none());
    }

    #[test]
    fn candidates_are_tried_in_order() {
        let formats = [
            ParseFormat::Pattern("jYYYY/jMM/jDD"),
            ParseFormat::Pattern("jYYYY/jM/jD"),
            ParseFormat::Iso8601,
        ];
        assert!(parse_strict::<NaiveDate>("1403/1/1", &formats).is_some());
        assert!(parse_strict::<NaiveDate>("2024-03-20", &formats).is_some());
        assert!(parse_strict::<NaiveDate>("not a date", &formats).is_none());
    }
}
