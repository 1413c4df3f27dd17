//! Jalali <-> Gregorian conversion over Julian Day Numbers.
//!
//! # Responsibility
//! - Decide which Jalali dates exist.
//! - Map Jalali dates to Gregorian dates and back without any date library.
//!
//! # Invariants
//! - Supported Jalali years are `MIN_JALALI_YEAR..=MAX_JALALI_YEAR`.
//! - Jalali months here are 1-based; the adapter converts to 0-based.
//! - All arithmetic truncates toward zero, matching the published break table
//!   formulas.

/// First supported Jalali year. The break table reaches back to -61, but
/// non-positive years have no four-digit `jYYYY` rendering.
pub const MIN_JALALI_YEAR: i32 = 1;
/// Last Jalali year covered by the break table.
pub const MAX_JALALI_YEAR: i32 = 3177;

const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Calendar triple without any calendar tag attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ymd {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub day: u32,
}

impl Ymd {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

struct YearInfo {
    /// `0` for a leap year; other values give the position inside the
    /// four/five-year sub-cycle.
    leap: i32,
    gregorian_year: i32,
    /// Day of March (Gregorian) on which 1 Farvardin falls.
    march: i32,
}

fn year_info(jalali_year: i32) -> Option<YearInfo> {
    if !(MIN_JALALI_YEAR..=MAX_JALALI_YEAR).contains(&jalali_year) {
        return None;
    }

    let gregorian_year = jalali_year + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jalali_year < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jalali_year - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Some(YearInfo {
        leap,
        gregorian_year,
        march,
    })
}

/// Returns whether Esfand of `jalali_year` has 30 days in the observational
/// calendar. Returns `None` outside the supported year range.
pub fn has_leap_esfand(jalali_year: i32) -> Option<bool> {
    year_info(jalali_year).map(|info| info.leap == 0)
}

/// Returns the real length of a 1-based Jalali month.
pub fn jalali_month_length(jalali_year: i32, month: u32) -> Option<u32> {
    match month {
        1..=6 => year_info(jalali_year).map(|_| 31),
        7..=11 => year_info(jalali_year).map(|_| 30),
        12 => has_leap_esfand(jalali_year).map(|leap| if leap { 30 } else { 29 }),
        _ => None,
    }
}

/// Returns whether the 1-based Jalali triple names an existing day.
pub fn is_valid_jalali(date: Ymd) -> bool {
    jalali_month_length(date.year, date.month)
        .is_some_and(|length| date.day >= 1 && date.day <= length)
}

/// Converts a Gregorian date to its Julian Day Number.
pub fn gregorian_to_jdn(date: Ymd) -> i64 {
    let gy = i64::from(date.year);
    let gm = i64::from(date.month);
    let gd = i64::from(date.day);

    let d = (gy + (gm - 8) / 6 + 100_100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd
        - 34_840_408;
    d - (gy + 100_100 + (gm - 8) / 6) / 100 * 3 / 4 + 752
}

/// Converts a Julian Day Number to a Gregorian date.
pub fn jdn_to_gregorian(jdn: i64) -> Ymd {
    let mut j = 4 * jdn + 139_361_631;
    j += (4 * jdn + 183_187_720) / 146_097 * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let day = (i % 153) / 5 + 1;
    let month = (i / 153) % 12 + 1;
    let year = j / 1461 - 100_100 + (8 - month) / 6;

    Ymd::new(year as i32, month as u32, day as u32)
}

/// Julian Day Number of 1 Farvardin of `jalali_year`.
fn farvardin_first_jdn(jalali_year: i32) -> Option<i64> {
    year_info(jalali_year)
        .map(|info| gregorian_to_jdn(Ymd::new(info.gregorian_year, 3, info.march as u32)))
}

/// Converts a valid 1-based Jalali date to its Julian Day Number.
///
/// Returns `None` when the date does not exist.
pub fn jalali_to_jdn(date: Ymd) -> Option<i64> {
    if !is_valid_jalali(date) {
        return None;
    }
    let month = i64::from(date.month);
    let farvardin_first = farvardin_first_jdn(date.year)?;

    Some(farvardin_first + (month - 1) * 31 - month / 7 * (month - 7) + i64::from(date.day) - 1)
}

/// Converts a Julian Day Number to a 1-based Jalali date.
///
/// Returns `None` when the day falls outside the supported year range.
pub fn jdn_to_jalali(jdn: i64) -> Option<Ymd> {
    let year = jdn_to_gregorian(jdn).year - 621;

    // Nowruz falls in March, so the day belongs to `year` or the one before.
    for candidate in [year, year - 1] {
        let Some(farvardin_first) = farvardin_first_jdn(candidate) else {
            continue;
        };
        let k = jdn - farvardin_first;
        if k < 0 {
            continue;
        }

        let (month, day) = if k <= 185 {
            (1 + k / 31, k % 31 + 1)
        } else {
            (7 + (k - 186) / 30, (k - 186) % 30 + 1)
        };
        let date = Ymd::new(candidate, month as u32, day as u32);
        return is_valid_jalali(date).then_some(date);
    }

    None
}

/// Converts a 1-based Jalali date to a Gregorian date.
pub fn jalali_to_gregorian(date: Ymd) -> Option<Ymd> {
    jalali_to_jdn(date).map(jdn_to_gregorian)
}

/// Converts a Gregorian date to a 1-based Jalali date.
pub fn gregorian_to_jalali(date: Ymd) -> Option<Ymd> {
    jdn_to_jalali(gregorian_to_jdn(date))
}
