//! TARGET2 euro settlement calendar.

use std::sync::OnceLock;

use super::bitmap::{HolidayBitmap, HolidayCalendarBuilder, Observance};
use super::Calendar;
use crate::types::Date;

static TARGET2: OnceLock<Target2Calendar> = OnceLock::new();

/// TARGET2 closing days: New Year's Day, Good Friday, Easter Monday, Labour Day,
/// Christmas Day and 26 December. None is moved when it falls on a weekend.
#[derive(Debug, Clone)]
pub struct Target2Calendar {
    bitmap: HolidayBitmap,
}

impl Target2Calendar {
    /// Builds the calendar. Prefer [`Target2Calendar::global`].
    pub fn new() -> Self {
        let bitmap = HolidayCalendarBuilder::new("TARGET2")
            .fixed(1, 1, Observance::Actual)
            .easter(-2)
            .easter(1)
            .fixed(5, 1, Observance::Actual)
            .fixed(12, 25, Observance::Actual)
            .fixed(12, 26, Observance::Actual)
            .build();
        Self { bitmap }
    }

    /// Process-wide instance, built on first use.
    pub fn global() -> &'static Target2Calendar {
        TARGET2.get_or_init(Target2Calendar::new)
    }
}

impl Default for Target2Calendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar for Target2Calendar {
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
    fn test_closing_days() {
        let cal = Target2Calendar::global();
        assert!(!cal.is_business_day(date(2025, 1, 1)));
        assert!(!cal.is_business_day(date(2025, 4, 18)));
        assert!(!cal.is_business_day(date(2025, 4, 21)));
        assert!(!cal.is_business_day(date(2025, 5, 1)));
        assert!(!cal.is_business_day(date(2025, 12, 25)));
        assert!(!cal.is_business_day(date(2025, 12, 26)));
        assert!(cal.is_business_day(date(2025, 12, 24)));
    }

    #[test]
    fn test_no_weekend_substitution() {
        let cal = Target2Calendar::global();
        // May 1 2027 is a Saturday; Monday May 3 stays open
        assert!(cal.is_business_day(date(2027, 5, 3)));
    }
}
