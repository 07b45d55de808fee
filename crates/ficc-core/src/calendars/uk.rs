//! England and Wales bank holidays, the settlement calendar for gilts.

use chrono::{NaiveDate, Weekday};
use std::sync::OnceLock;

use super::bitmap::{HolidayBitmap, HolidayCalendarBuilder, HolidayRule, Observance};
use super::Calendar;
use crate::types::Date;

static UK: OnceLock<UkCalendar> = OnceLock::new();

/// UK bank holiday calendar.
///
/// Weekend New Year, Christmas and Boxing Day holidays are substituted by the next
/// free weekday. Moved and one-off royal holidays are listed explicitly.
#[derive(Debug, Clone)]
pub struct UkCalendar {
    bitmap: HolidayBitmap,
}

impl UkCalendar {
    /// Builds the calendar. Prefer [`UkCalendar::global`].
    pub fn new() -> Self {
        let bitmap = HolidayCalendarBuilder::new("UK Bank Holidays")
            .fixed(1, 1, Observance::Substitute)
            .easter(-2)
            .easter(1)
            .rule(HolidayRule::Moved {
                rule: Box::new(HolidayRule::NthWeekday {
                    month: 5,
                    weekday: Weekday::Mon,
                    n: 1,
                }),
                exceptions: one_off(&[(1995, 5, 8), (2020, 5, 8)]),
            })
            .rule(HolidayRule::Moved {
                rule: Box::new(HolidayRule::LastWeekday {
                    month: 5,
                    weekday: Weekday::Mon,
                }),
                exceptions: one_off(&[(2002, 6, 4), (2012, 6, 4), (2022, 6, 2)]),
            })
            .last_weekday(8, Weekday::Mon)
            .fixed(12, 25, Observance::Substitute)
            .fixed(12, 26, Observance::Substitute)
            .dates(
                one_off(&[
                    (1999, 12, 31),
                    (2002, 6, 3),
                    (2011, 4, 29),
                    (2012, 6, 5),
                    (2022, 6, 3),
                    (2022, 9, 19),
                    (2023, 5, 8),
                ])
                .into_iter()
                .map(|(_, d)| d),
            )
            .build();
        Self { bitmap }
    }

    /// Process-wide instance, built on first use.
    pub fn global() -> &'static UkCalendar {
        UK.get_or_init(UkCalendar::new)
    }
}

fn one_off(dates: &[(i32, u32, u32)]) -> Vec<(i32, NaiveDate)> {
    dates
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).map(|date| (y, date)))
        .collect()
}

impl Default for UkCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar for UkCalendar {
    fn name(&self) -> &'static str {
        self.bitmap.name()
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.bitmap.is_business_day(date)
    }
}
