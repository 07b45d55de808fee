//! US government bond market calendar (SIFMA recommended closes).

use chrono::Weekday;
use std::sync::OnceLock;

use super::bitmap::{HolidayBitmap, HolidayCalendarBuilder, Observance};
use super::Calendar;
use crate::types::Date;

static US_GOVERNMENT: OnceLock<UsGovernmentCalendar> = OnceLock::new();

/// SIFMA holiday calendar for US Treasury and agency settlement.
///
/// Full closes only; early closes (day before Independence Day, day after
/// Thanksgiving, Christmas Eve) are business days. Juneteenth is a holiday from 2022,
/// the first year SIFMA recommended a close.
#[derive(Debug, Clone)]
pub struct UsGovernmentCalendar {
    bitmap: HolidayBitmap,
}

impl UsGovernmentCalendar {
    /// Builds the calendar. Prefer [`UsGovernmentCalendar::global`].
    pub fn new() -> Self {
        let bitmap = HolidayCalendarBuilder::new("US Government (SIFMA)")
            .fixed(1, 1, Observance::SundayToMonday)
            .nth_weekday(1, Weekday::Mon, 3)
            .nth_weekday(2, Weekday::Mon, 3)
            .easter(-2)
            .last_weekday(5, Weekday::Mon)
            .fixed_from(6, 19, Observance::NearestWeekday, 2022)
            .fixed(7, 4, Observance::NearestWeekday)
            .nth_weekday(9, Weekday::Mon, 1)
            .nth_weekday(10, Weekday::Mon, 2)
            .fixed(11, 11, Observance::NearestWeekday)
            .nth_weekday(11, Weekday::Thu, 4)
            .fixed(12, 25, Observance::NearestWeekday)
            .build();
        Self { bitmap }
    }

    /// Process-wide instance, built on first use.
    pub fn global() -> &'static UsGovernmentCalendar {
        US_GOVERNMENT.get_or_init(UsGovernmentCalendar::new)
    }
}

impl Default for UsGovernmentCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar for UsGovernmentCalendar {
    fn name(&self) -> &'static str {
        self.bitmap.name()
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.bitmap.is_business_day(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_and_floating_holidays_2025() {
        let cal = UsGovernmentCalendar::global();
        for holiday in [
            date(2025, 1, 1),
            date(2025, 1, 20),
            date(2025, 2, 17),
            date(2025, 4, 18),
            date(2025, 5, 26),
            date(2025, 6, 19),
            date(2025, 7, 4),
            date(2025, 9, 1),
            date(2025, 10, 13),
            date(2025, 11, 11),
            date(2025, 11, 27),
            date(2025, 12, 25),
        ] {
            assert!(!cal.is_business_day(holiday), "{holiday} should be closed");
        }
        assert!(cal.is_business_day(date(2025, 1, 2)));
        assert!(cal.is_business_day(date(2025, 11, 28)));
    }

    #[test]
    fn test_observed_days() {
        let cal = UsGovernmentCalendar::global();
        // July 4 2026 is a Saturday, observed Friday
        assert!(!cal.is_business_day(date(2026, 7, 3)));
        // Jan 1 2022 is a Saturday, Dec 31 2021 stays open
        assert!(cal.is_business_day(date(2021, 12, 31)));
        // Jan 1 2023 is a Sunday, observed Monday
        assert!(!cal.is_business_day(date(2023, 1, 2)));
    }

    #[test]
    fn test_juneteenth_start_year() {
        let cal = UsGovernmentCalendar::global();
        assert!(cal.is_business_day(date(2021, 6, 18)));
        assert!(!cal.is_business_day(date(2025, 6, 19)));
    }

    #[test]
    fn test_advance_over_holiday() {
        let cal = UsGovernmentCalendar::global();
        // Thursday July 3 2025 + 1 business day skips Independence Day and the weekend
        assert_eq!(cal.advance(date(2025, 7, 3), 1), date(2025, 7, 7));
    }
}
