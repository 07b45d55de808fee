//! Rule-driven holiday calendars stored as bitmaps.
//!
//! Holiday rules are expanded once, year by year, into a bitmap with one bit per
//! calendar day. Lookups are then a shift and a mask.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

use crate::types::Date;

/// First year covered by holiday bitmaps.
pub const MIN_YEAR: i32 = 1970;
/// Last year covered by holiday bitmaps.
pub const MAX_YEAR: i32 = 2150;

const DAYS_PER_SLOT: usize = 366;
const WORD_COUNT: usize = ((MAX_YEAR - MIN_YEAR + 1) as usize * DAYS_PER_SLOT).div_ceil(64);

/// How a holiday falling on a weekend is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observance {
    /// Not moved; a weekend holiday is simply lost.
    Actual,
    /// Saturday moves to Friday, Sunday to Monday (US federal rule).
    NearestWeekday,
    /// Sunday moves to Monday; a Saturday holiday is not observed.
    SundayToMonday,
    /// Moves forward to the next weekday that is not already a holiday (UK substitute days).
    Substitute,
}

/// One recurring or one-off holiday.
#[derive(Debug, Clone)]
pub enum HolidayRule {
    /// Same month and day every year, from `from_year` onwards.
    Fixed {
        /// Month (1-12).
        month: u32,
        /// Day of month.
        day: u32,
        /// Weekend handling.
        observance: Observance,
        /// First year the holiday exists.
        from_year: i32,
    },
    /// The nth given weekday of a month (e.g. 3rd Monday of January).
    NthWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday.
        weekday: Weekday,
        /// Occurrence, starting at 1.
        n: u32,
    },
    /// The last given weekday of a month.
    LastWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday.
        weekday: Weekday,
    },
    /// Offset in days from Easter Sunday.
    Easter {
        /// Offset (-2 is Good Friday, 1 is Easter Monday).
        offset: i64,
    },
    /// Explicit dates, used for one-off closures and moved holidays.
    Dates(Vec<NaiveDate>),
    /// Explicit dates that replace a recurring rule in the listed years.
    Moved {
        /// The rule applied in every other year.
        rule: Box<HolidayRule>,
        /// (year, replacement date) pairs.
        exceptions: Vec<(i32, NaiveDate)>,
    },
}

impl HolidayRule {
    /// Raw holiday dates for a year, before weekend observance.
    fn dates_in(&self, year: i32) -> Vec<NaiveDate> {
        match self {
            HolidayRule::Fixed {
                month,
                day,
                from_year,
                ..
            } => {
                if year < *from_year {
                    return Vec::new();
                }
                NaiveDate::from_ymd_opt(year, *month, *day).into_iter().collect()
            }
            HolidayRule::NthWeekday { month, weekday, n } => {
                nth_weekday_of_month(year, *month, *weekday, *n).into_iter().collect()
            }
            HolidayRule::LastWeekday { month, weekday } => {
                last_weekday_of_month(year, *month, *weekday).into_iter().collect()
            }
            HolidayRule::Easter { offset } => easter_sunday(year)
                .and_then(|e| e.checked_add_signed(chrono::Duration::days(*offset)))
                .into_iter()
                .collect(),
            HolidayRule::Dates(dates) => dates.iter().copied().filter(|d| d.year() == year).collect(),
            HolidayRule::Moved { rule, exceptions } => {
                match exceptions.iter().find(|(y, _)| *y == year) {
                    Some((_, moved)) => vec![*moved],
                    None => rule.dates_in(year),
                }
            }
        }
    }

    fn observance(&self) -> Observance {
        match self {
            HolidayRule::Fixed { observance, .. } => *observance,
            _ => Observance::Actual,
        }
    }
}

/// Bitmap of holidays over [`MIN_YEAR`, `MAX_YEAR`], weekends Saturday and Sunday.
///
/// Dates outside the covered years are treated as having no holidays.
#[derive(Clone)]
pub struct HolidayBitmap {
    name: &'static str,
    bits: Box<[u64]>,
}

impl std::fmt::Debug for HolidayBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayBitmap")
            .field("name", &self.name)
            .field("holiday_count", &self.count_holidays())
            .finish()
    }
}

impl HolidayBitmap {
    fn empty(name: &'static str) -> Self {
        Self {
            name,
            bits: vec![0u64; WORD_COUNT].into_boxed_slice(),
        }
    }

    /// Name of this calendar.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn insert(&mut self, date: NaiveDate) {
        if let Some((word, bit)) = Self::slot(date) {
            self.bits[word] |= 1u64 << bit;
        }
    }

    /// Check if a date is a holiday (weekends excluded).
    #[inline]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        Self::slot(date).is_some_and(|(word, bit)| self.bits[word] & (1u64 << bit) != 0)
    }

    /// A business day is neither a weekend nor a holiday.
    #[inline]
    pub fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.is_holiday(date.as_naive_date())
    }

    /// Count of holidays in the bitmap.
    pub fn count_holidays(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    fn slot(date: NaiveDate) -> Option<(usize, usize)> {
        let year = date.year();
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        let position = (year - MIN_YEAR) as usize * DAYS_PER_SLOT + date.ordinal0() as usize;
        Some((position / 64, position % 64))
    }
}

/// Builder expanding [`HolidayRule`]s into a [`HolidayBitmap`].
///
/// Rules are applied in insertion order within each year, so a substitute day
/// skips any holiday produced by an earlier rule.
#[derive(Debug, Clone)]
pub struct HolidayCalendarBuilder {
    name: &'static str,
    rules: Vec<HolidayRule>,
}

impl HolidayCalendarBuilder {
    /// Create a new builder.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    /// Add any rule.
    pub fn rule(mut self, rule: HolidayRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a fixed-date holiday observed every year.
    pub fn fixed(self, month: u32, day: u32, observance: Observance) -> Self {
        self.fixed_from(month, day, observance, MIN_YEAR)
    }

    /// Add a fixed-date holiday observed from `from_year`.
    pub fn fixed_from(self, month: u32, day: u32, observance: Observance, from_year: i32) -> Self {
        self.rule(HolidayRule::Fixed {
            month,
            day,
            observance,
            from_year,
        })
    }

    /// Add the nth weekday of a month.
    pub fn nth_weekday(self, month: u32, weekday: Weekday, n: u32) -> Self {
        self.rule(HolidayRule::NthWeekday { month, weekday, n })
    }

    /// Add the last weekday of a month.
    pub fn last_weekday(self, month: u32, weekday: Weekday) -> Self {
        self.rule(HolidayRule::LastWeekday { month, weekday })
    }

    /// Add a holiday at an offset from Easter Sunday.
    pub fn easter(self, offset: i64) -> Self {
        self.rule(HolidayRule::Easter { offset })
    }

    /// Add one-off dates.
    pub fn dates<I: IntoIterator<Item = NaiveDate>>(self, dates: I) -> Self {
        self.rule(HolidayRule::Dates(dates.into_iter().collect()))
    }

    /// Expand every rule over the covered years.
    pub fn build(self) -> HolidayBitmap {
        let mut bitmap = HolidayBitmap::empty(self.name);
        let mut year_holidays = HashSet::new();

        for year in MIN_YEAR..=MAX_YEAR {
            year_holidays.clear();
            for rule in &self.rules {
                for raw in rule.dates_in(year) {
                    let observed = observe(raw, rule.observance(), &year_holidays);
                    year_holidays.insert(observed);
                }
            }
            for &date in &year_holidays {
                bitmap.insert(date);
            }
        }

        log::debug!(
            "built {} holiday bitmap for {MIN_YEAR}..={MAX_YEAR} from {} rules",
            self.name,
            self.rules.len()
        );
        bitmap
    }
}

fn observe(date: NaiveDate, observance: Observance, taken: &HashSet<NaiveDate>) -> NaiveDate {
    let is_weekend = |d: NaiveDate| matches!(d.weekday(), Weekday::Sat | Weekday::Sun);
    match observance {
        Observance::Actual => date,
        Observance::NearestWeekday => match date.weekday() {
            Weekday::Sat => date.pred_opt().unwrap_or(date),
            Weekday::Sun => date.succ_opt().unwrap_or(date),
            _ => date,
        },
        Observance::SundayToMonday => match date.weekday() {
            Weekday::Sun => date.succ_opt().unwrap_or(date),
            _ => date,
        },
        Observance::Substitute => {
            if !is_weekend(date) {
                return date;
            }
            let mut candidate = date;
            while is_weekend(candidate) || taken.contains(&candidate) {
                match candidate.succ_opt() {
                    Some(next) => candidate = next,
                    None => return date,
                }
            }
            candidate
        }
    }
}

/// The nth occurrence of a weekday in a month.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, u8::try_from(n).ok()?)
}

/// The last occurrence of a weekday in a month.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last_day = NaiveDate::from_ymd_opt(year, month, crate::types::days_in_month(year, month))?;
    let days_back = (last_day.weekday().num_days_from_monday() as i64
        - weekday.num_days_from_monday() as i64)
        .rem_euclid(7);
    last_day.checked_sub_signed(chrono::Duration::days(days_back))
}

/// Easter Sunday by the anonymous Gregorian algorithm.
#[allow(clippy::many_single_char_names)]
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
