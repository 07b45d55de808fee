//! 30/360 day count conventions.

use super::DayCount;
use crate::types::Date;

#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

#[inline]
fn thirty_360_days(start: Date, end: Date, d1: u32, d2: u32) -> i64 {
    360 * i64::from(end.year() - start.year())
        + 30 * (i64::from(end.month()) - i64::from(start.month()))
        + (i64::from(d2) - i64::from(d1))
}

/// 30/360 US day count convention (Bond Basis).
///
/// # Rules
///
/// 1. If D1 is the last day of February, change D1 to 30
/// 2. If D1 is 31, change D1 to 30
/// 3. If D2 is the last day of February and D1 was the last day of February, change D2 to 30
/// 4. If D2 is 31 and D1 is now 30, change D2 to 30
///
/// $$\text{Days} = 360 \times (Y_2 - Y_1) + 30 \times (M_2 - M_1) + (D_2 - D_1)$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let start_feb_eom = is_last_day_of_february(start);

        let d1 = if start_feb_eom || start.day() == 31 {
            30
        } else {
            start.day()
        };

        let d2 = if start_feb_eom && is_last_day_of_february(end) {
            30
        } else if end.day() == 31 && d1 >= 30 {
            30
        } else {
            end.day()
        };

        thirty_360_days(start, end, d1, d2)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }
}

/// 30E/360 day count convention (Eurobond Basis).
///
/// Both D1 and D2 are capped at 30. No February adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        thirty_360_days(start, end, start.day().min(30), end.day().min(30))
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_us_full_year() {
        assert_eq!(Thirty360US.day_count(date(2025, 1, 1), date(2026, 1, 1)), 360);
        assert_eq!(Thirty360US.year_fraction(date(2025, 1, 1), date(2026, 1, 1)), 1.0);
    }

    #[test]
    fn test_us_day_31_rules() {
        // D1 = 31 becomes 30, D2 = 31 follows
        assert_eq!(Thirty360US.day_count(date(2025, 1, 31), date(2025, 3, 31)), 60);
        // D2 = 31 kept when D1 < 30
        assert_eq!(Thirty360US.day_count(date(2025, 1, 15), date(2025, 3, 31)), 76);
    }

    #[test]
    fn test_us_february_end_of_month() {
        // Feb 28 (non-leap) to Mar 31: D1 = 30, then D2 = 30
        assert_eq!(Thirty360US.day_count(date(2025, 2, 28), date(2025, 3, 31)), 30);
        // Feb EOM to Feb EOM is a whole year
        assert_eq!(Thirty360US.day_count(date(2024, 2, 29), date(2025, 2, 28)), 360);
        // D2 Feb EOM alone is not adjusted
        assert_eq!(Thirty360US.day_count(date(2025, 1, 15), date(2025, 2, 28)), 43);
    }

    #[test]
    fn test_eurobond() {
        assert_eq!(Thirty360E.day_count(date(2025, 1, 15), date(2025, 3, 31)), 75);
        assert_eq!(Thirty360E.day_count(date(2025, 2, 28), date(2025, 3, 31)), 32);
        assert_eq!(Thirty360E.year_fraction(date(2025, 1, 31), date(2025, 7, 31)), 0.5);
    }

    #[test]
    fn test_reversed_dates_are_negative() {
        assert_eq!(Thirty360US.day_count(date(2025, 7, 15), date(2025, 1, 15)), -180);
    }
}
