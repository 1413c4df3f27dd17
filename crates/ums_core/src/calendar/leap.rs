//! Arithmetic leap-year and month-length rules for the month grid.
//!
//! # Invariants
//! - `is_leap_year` is total over `i32` and periodic with [`GRAND_CYCLE_YEARS`].
//! - Month indexes are 0-based (`0` = Farvardin, `11` = Esfand).

/// Length of the arithmetic grand cycle in years.
pub const GRAND_CYCLE_YEARS: i32 = 2820;

const CYCLE_EPOCH_YEAR: i32 = 474;
const CYCLE_BREAKS: [i32; 8] = [1, 5, 9, 13, 17, 22, 26, 30];

/// Index of Esfand, the only month whose length depends on the year.
pub const ESFAND: u32 = 11;

/// Returns whether `year` is leap under the 2820-year grand cycle.
///
/// The year is folded into the cycle around year 474, then measured from the
/// last break point not greater than the folded value.
pub fn is_leap_year(year: i32) -> bool {
    let aux = (year - CYCLE_EPOCH_YEAR).rem_euclid(GRAND_CYCLE_YEARS) + CYCLE_EPOCH_YEAR;

    let mut jp = CYCLE_BREAKS[0];
    for &jump in &CYCLE_BREAKS[1..] {
        if aux < jump {
            break;
        }
        jp = jump;
    }

    let n = aux - jp;
    (n % 33) % 4 == 1
}

/// Returns the number of days in a 0-based Jalali month.
///
/// Returns `None` when `month` is outside `0..=11`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    match month {
        0..=5 => Some(31),
        6..=10 => Some(30),
        ESFAND if is_leap_year(year) => Some(30),
        ESFAND => Some(29),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, is_leap_year, GRAND_CYCLE_YEARS};

    #[test]
    fn leap_rule_is_periodic_over_grand_cycle() {
        for year in 1..=3000 {
            assert_eq!(
                is_leap_year(year),
                is_leap_year(year + GRAND_CYCLE_YEARS),
                "year {year}"
            );
        }
    }

    #[test]
    fn leap_rule_matches_break_point_walk() {
        // aux = 1404, jp = 30, n = 1374, 1374 % 33 = 21, 21 % 4 = 1
        assert!(is_leap_year(1404));
        // n = 1373, 1373 % 33 = 20
        assert!(!is_leap_year(1403));
    }

    #[test]
    fn leap_rule_handles_years_before_cycle_epoch() {
        assert_eq!(is_leap_year(-100), is_leap_year(-100 + GRAND_CYCLE_YEARS));
        assert_eq!(is_leap_year(0), is_leap_year(GRAND_CYCLE_YEARS));
    }

    #[test]
    fn month_lengths_follow_half_year_split() {
        for month in 0..6 {
            assert_eq!(days_in_month(1400, month), Some(31));
        }
        for month in 6..11 {
            assert_eq!(days_in_month(1400, month), Some(30));
        }
        assert_eq!(days_in_month(1404, 11), Some(30));
        assert_eq!(days_in_month(1403, 11), Some(29));
        assert_eq!(days_in_month(1403, 12), None);
    }
}
