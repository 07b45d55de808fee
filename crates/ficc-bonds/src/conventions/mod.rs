//! Market conventions and their resolution from issuer classifications.
//!
//! - [`Conventions`]: the day count, business day convention, calendar and frequency
//!   a bond is analyzed under
//! - [`ConventionTable`]: classification to conventions policy data
//! - [`ConventionResolver`]: applies the table, the fallback and contractual overrides
//!
//! # Example
//!
//! ```rust
//! use ficc_bonds::conventions::ConventionResolver;
//! use ficc_core::daycounts::DayCountConvention;
//!
//! let resolver = ConventionResolver::standard();
//! let resolution = resolver.resolve_classification(Some("US Corporate"), None);
//! assert_eq!(resolution.conventions.day_count, DayCountConvention::Thirty360US);
//! assert!(!resolution.used_fallback);
//! ```

mod resolver;
mod table;

pub use resolver::{ConventionResolver, Resolution};
pub use table::{normalize_classification, ConventionEntry, ConventionTable, FrequencySpec};

use serde::{Deserialize, Serialize};
use std::fmt;

use ficc_core::calendars::{BusinessDayConvention, CalendarId};
use ficc_core::daycounts::DayCountConvention;
use ficc_core::types::Frequency;

/// Conventions a bond is analyzed under.
///
/// Only produced by [`ConventionResolver`] (or read from a [`ConventionTable`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conventions {
    /// Day count used for accrual, coupon amounts and discounting.
    pub day_count: DayCountConvention,
    /// Payment date adjustment.
    pub business_day_convention: BusinessDayConvention,
    /// Calendar for payment dates and settlement lag.
    pub calendar: CalendarId,
    /// Coupon frequency, also the yield compounding frequency.
    pub frequency: Frequency,
    /// Keep month-end anchors on month ends when rolling the schedule.
    pub end_of_month: bool,
}

impl Conventions {
    /// Creates conventions with the end-of-month rule enabled.
    #[must_use]
    pub fn new(
        day_count: DayCountConvention,
        business_day_convention: BusinessDayConvention,
        calendar: CalendarId,
        frequency: Frequency,
    ) -> Self {
        Self {
            day_count,
            business_day_convention,
            calendar,
            frequency,
            end_of_month: true,
        }
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn with_end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Sets the frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Conventions used when a classification is missing or unknown:
    /// Actual/Actual (Bond), unadjusted, semi-annual, no holidays.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(
            DayCountConvention::ActActBond,
            BusinessDayConvention::Unadjusted,
            CalendarId::Null,
            Frequency::SemiAnnual,
        )
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self::fallback()
    }
}

impl fmt::Display for Conventions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.day_count, self.business_day_convention, self.calendar, self.frequency
        )?;
        if self.end_of_month {
            write!(f, " / EOM")?;
        }
        Ok(())
    }
}
