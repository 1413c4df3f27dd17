//! Gregorian date primitive seam.
//!
//! The Jalali adapter only needs a handful of capabilities from the wrapped
//! date library. Keeping them behind [`GregorianDate`] lets the calendar logic
//! stay independent of any concrete date type.

use chrono::{Datelike, Days, Local, NaiveDate};

/// Day-granularity Gregorian date capability used by the Jalali adapter.
pub trait GregorianDate: Copy + Ord + std::fmt::Debug + 'static {
    /// Builds a date from a Gregorian triple (1-based month), or `None` when
    /// the triple does not exist or is not representable.
    fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self>;
    fn year(&self) -> i32;
    /// 1-based month.
    fn month(&self) -> u32;
    fn day(&self) -> u32;
    /// Adds (or subtracts, for negative values) whole days.
    fn add_days(&self, days: i64) -> Option<Self>;
    /// 0 = Sunday .. 6 = Saturday.
    fn weekday(&self) -> u32;
    /// Current local date from the ambient clock.
    fn today() -> Self;
}

impl GregorianDate for NaiveDate {
    fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn year(&self) -> i32 {
        Datelike::year(self)
    }

    fn month(&self) -> u32 {
        Datelike::month(self)
    }

    fn day(&self) -> u32 {
        Datelike::day(self)
    }

    fn add_days(&self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        if days >= 0 {
            self.checked_add_days(magnitude)
        } else {
            self.checked_sub_days(magnitude)
        }
    }

    fn weekday(&self) -> u32 {
        Datelike::weekday(self).num_days_from_sunday()
    }

    fn today() -> Self {
        Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::GregorianDate;
    use chrono::NaiveDate;

    #[test]
    fn weekday_counts_from_sunday() {
        let nowruz = <NaiveDate as GregorianDate>::from_ymd(2024, 3, 20).unwrap();
        // Wednesday
        assert_eq!(GregorianDate::weekday(&nowruz), 3);
    }

    #[test]
    fn add_days_crosses_month_and_goes_backwards() {
        let date = <NaiveDate as GregorianDate>::from_ymd(2024, 2, 28).unwrap();
        let forward = GregorianDate::add_days(&date, 2).unwrap();
        assert_eq!((forward.year(), forward.month(), forward.day()), (2024, 3, 1));
        let back = GregorianDate::add_days(&forward, -2).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn from_ymd_rejects_missing_days() {
        assert!(<NaiveDate as GregorianDate>::from_ymd(2023, 2, 29).is_none());
    }
}
