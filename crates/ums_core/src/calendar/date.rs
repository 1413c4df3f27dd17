//! Day-granularity date value readable in both Gregorian and Jalali terms.
//!
//! # Invariants
//! - A valid `CalendarDate` always carries a Gregorian primitive and the
//!   matching Jalali triple; they never disagree.
//! - Construction from a non-existing Jalali triple fails, it never clamps.
//! - Arithmetic on the invalid sentinel yields the invalid sentinel.

use super::conversion::{self, Ymd};
use super::gregorian::GregorianDate;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Jalali calendar components with a 0-based month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    pub year: i32,
    /// 0 = Farvardin .. 11 = Esfand.
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    fn from_ymd(ymd: Ymd) -> Self {
        Self {
            year: ymd.year,
            month: ymd.month - 1,
            day: ymd.day,
        }
    }

    fn to_ymd(self) -> Ymd {
        Ymd::new(self.year, self.month + 1, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Resolved<G> {
    gregorian: G,
    jalali: JalaliDate,
}

/// Immutable calendar date, or the invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate<G: GregorianDate = NaiveDate> {
    inner: Option<Resolved<G>>,
}

impl<G: GregorianDate> CalendarDate<G> {
    /// The invalid sentinel.
    pub const fn invalid() -> Self {
        Self { inner: None }
    }

    /// Wraps a Gregorian date. Days outside the supported Jalali range give
    /// the invalid sentinel.
    pub fn from_gregorian(gregorian: G) -> Self {
        let jalali = conversion::gregorian_to_jalali(Ymd::new(
            gregorian.year(),
            gregorian.month(),
            gregorian.day(),
        ));
        Self {
            inner: jalali.map(|ymd| Resolved {
                gregorian,
                jalali: JalaliDate::from_ymd(ymd),
            }),
        }
    }

    /// Builds a date from Jalali components (0-based month).
    ///
    /// Returns `None` when the day does not exist in that Jalali month.
    pub fn from_jalali(year: i32, month: u32, day: u32) -> Option<Self> {
        let jalali = JalaliDate { year, month, day };
        if month > 11 {
            return None;
        }
        let gregorian = conversion::jalali_to_gregorian(jalali.to_ymd())?;
        let gregorian = G::from_ymd(gregorian.year, gregorian.month, gregorian.day)?;
        Some(Self {
            inner: Some(Resolved { gregorian, jalali }),
        })
    }

    /// Builds a date from a Gregorian triple (1-based month).
    pub fn from_gregorian_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = Self::from_gregorian(G::from_ymd(year, month, day)?);
        date.is_valid().then_some(date)
    }

    /// Current local date.
    pub fn today() -> Self {
        Self::from_gregorian(G::today())
    }

    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    pub fn gregorian(&self) -> Option<G> {
        self.inner.map(|resolved| resolved.gregorian)
    }

    pub fn jalali(&self) -> Option<JalaliDate> {
        self.inner.map(|resolved| resolved.jalali)
    }

    /// Weekday, 0 = Sunday .. 6 = Saturday.
    pub fn weekday(&self) -> Option<u32> {
        self.gregorian().map(|gregorian| gregorian.weekday())
    }

    /// Adds whole days regardless of calendar system.
    pub fn add_days(&self, days: i64) -> Self {
        self.gregorian()
            .and_then(|gregorian| gregorian.add_days(days))
            .map_or_else(Self::invalid, Self::from_gregorian)
    }

    /// Adds Jalali months, clamping the day to the end of the target month.
    pub fn add_jalali_months(&self, months: i64) -> Self {
        let Some(jalali) = self.jalali() else {
            return Self::invalid();
        };
        let elapsed = i64::from(jalali.year) * 12 + i64::from(jalali.month);
        let Some(total) = elapsed.checked_add(months) else {
            return Self::invalid();
        };
        let Ok(year) = i32::try_from(total.div_euclid(12)) else {
            return Self::invalid();
        };
        let month = total.rem_euclid(12) as u32;
        Self::clamped(year, month, jalali.day)
    }

    /// Adds Jalali years, clamping 30 Esfand to 29 Esfand in common years.
    pub fn add_jalali_years(&self, years: i64) -> Self {
        let Some(jalali) = self.jalali() else {
            return Self::invalid();
        };
        let Some(year) = i64::from(jalali.year)
            .checked_add(years)
            .and_then(|year| i32::try_from(year).ok())
        else {
            return Self::invalid();
        };
        Self::clamped(year, jalali.month, jalali.day)
    }

    /// Orders two dates; the invalid sentinel is not comparable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.gregorian()?.cmp(&other.gregorian()?))
    }

    fn clamped(year: i32, month: u32, day: u32) -> Self {
        conversion::jalali_month_length(year, month + 1)
            .and_then(|length| Self::from_jalali(year, month, day.min(length)))
            .unwrap_or_else(Self::invalid)
    }
}

impl<G: GregorianDate> Default for CalendarDate<G> {
    fn default() -> Self {
        Self::invalid()
    }
}
