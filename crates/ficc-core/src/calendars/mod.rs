//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait and the market calendars the convention table refers to
//! - Business day adjustment conventions and the [`BusinessDayAdjuster`]
//! - [`CalendarId`] and the [`CalendarRegistry`] that resolves ids to calendars

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod bitmap;
mod conventions;
mod target2;
mod uk;
mod us_government;

pub use bitmap::{
    easter_sunday, last_weekday_of_month, nth_weekday_of_month, HolidayBitmap,
    HolidayCalendarBuilder, HolidayRule, Observance, MAX_YEAR, MIN_YEAR,
};
pub use conventions::{adjust, BusinessDayAdjuster, BusinessDayConvention};
pub use target2::Target2Calendar;
pub use uk::UkCalendar;
pub use us_government::UsGovernmentCalendar;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a weekend day or holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Moves `days` business days from `date`.
    ///
    /// Zero rolls a non-business day forward to the next business day. The result
    /// is non-decreasing in `days`.
    fn advance(&self, date: Date, days: i32) -> Date {
        if days == 0 {
            return conventions::adjust(date, BusinessDayConvention::Following, self);
        }

        let step: i64 = if days > 0 { 1 } else { -1 };
        let mut remaining = days.unsigned_abs();
        let mut result = date;
        while remaining > 0 {
            result = result.add_days(step);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }
        result
    }
}

impl<T: Calendar + ?Sized> Calendar for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_business_day(&self, date: Date) -> bool {
        (**self).is_business_day(date)
    }
}

/// Calendar in which every day is a business day.
///
/// Used where no adjustment should ever happen.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &'static str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// A weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Identifier of a market calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CalendarId {
    /// Every day is a business day.
    #[default]
    Null,
    /// Saturdays and Sundays only.
    WeekendOnly,
    /// SIFMA US government bond calendar.
    UsGovernment,
    /// England and Wales bank holidays.
    UnitedKingdom,
    /// TARGET2 euro settlement days.
    Target2,
}

impl CalendarId {
    /// Every id the standard registry knows.
    pub const ALL: [CalendarId; 5] = [
        CalendarId::Null,
        CalendarId::WeekendOnly,
        CalendarId::UsGovernment,
        CalendarId::UnitedKingdom,
        CalendarId::Target2,
    ];

    /// Canonical configuration code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            CalendarId::Null => "NULL",
            CalendarId::WeekendOnly => "WEEKEND",
            CalendarId::UsGovernment => "US_GOVT",
            CalendarId::UnitedKingdom => "UK",
            CalendarId::Target2 => "TARGET2",
        }
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for CalendarId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "NULL" | "NONE" => Ok(CalendarId::Null),
            "WEEKEND" | "WEEKENDS_ONLY" | "WEEKEND_ONLY" => Ok(CalendarId::WeekendOnly),
            "US_GOVT" | "US_GOVERNMENT" | "SIFMA" | "US" => Ok(CalendarId::UsGovernment),
            "UK" | "LONDON" | "GBP" => Ok(CalendarId::UnitedKingdom),
            "TARGET2" | "TARGET" | "EUR" => Ok(CalendarId::Target2),
            _ => Err(CoreError::unsupported("calendar", s)),
        }
    }
}

/// Resolves [`CalendarId`]s to calendar instances.
///
/// Immutable once built; lookups of ids that were never registered fail with
/// `CoreError::UnsupportedConvention`.
#[derive(Clone, Default)]
pub struct CalendarRegistry {
    calendars: HashMap<CalendarId, Arc<dyn Calendar>>,
}

impl CalendarRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding every built-in calendar.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with(CalendarId::Null, Arc::new(NullCalendar))
            .with(CalendarId::WeekendOnly, Arc::new(WeekendCalendar))
            .with(CalendarId::UsGovernment, Arc::new(UsGovernmentCalendar::global()))
            .with(CalendarId::UnitedKingdom, Arc::new(UkCalendar::global()))
            .with(CalendarId::Target2, Arc::new(Target2Calendar::global()))
    }

    /// Registers (or replaces) a calendar.
    #[must_use]
    pub fn with(mut self, id: CalendarId, calendar: Arc<dyn Calendar>) -> Self {
        self.calendars.insert(id, calendar);
        self
    }

    /// Looks up a calendar.
    pub fn get(&self, id: CalendarId) -> CoreResult<&dyn Calendar> {
        self.calendars
            .get(&id)
            .map(|calendar| &**calendar)
            .ok_or_else(|| CoreError::unsupported("calendar", id.code()))
    }

    /// True if the id is registered.
    #[must_use]
    pub fn contains(&self, id: CalendarId) -> bool {
        self.calendars.contains_key(&id)
    }
}

impl fmt::Debug for CalendarRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.calendars.keys().map(CalendarId::code).collect();
        ids.sort_unstable();
        f.debug_struct("CalendarRegistry").field("calendars", &ids).finish()
    }
}
