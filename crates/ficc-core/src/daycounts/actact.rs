//! Actual/Actual day count conventions.

use chrono::Datelike;

use super::DayCount;
use crate::types::{is_leap_year, Date};

fn days_in_year(year: i32) -> f64 {
    if is_leap_year(year) {
        366.0
    } else {
        365.0
    }
}

/// Actual/Actual ISDA day count convention.
///
/// The period is split at calendar-year boundaries; each part is divided by the
/// length of its own year.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap years}}{365} + \frac{\text{Days in leap years}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if end < start {
            return -self.year_fraction(end, start);
        }

        let (y1, y2) = (start.year(), end.year());
        if y1 == y2 {
            return start.days_between(&end) as f64 / days_in_year(y1);
        }

        // Remainder of the first year, whole years in between, head of the last year
        let first = days_in_year(y1) - f64::from(start.as_naive_date().ordinal0());
        let last = f64::from(end.as_naive_date().ordinal0());
        first / days_in_year(y1) + f64::from(y2 - y1 - 1) + last / days_in_year(y2)
    }
}

/// Actual/Actual (Bond) day count convention, also known as ACT/ACT ICMA.
///
/// Within a coupon period the accrued fraction is actual days elapsed over actual
/// days in the period, bounded by the unadjusted schedule dates. It is exactly 0 at
/// the period start and exactly 1 at the period end.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Days}}{\text{Frequency} \times \text{Days in Period}}$$
///
/// Without a reference period the year fraction falls back to [`ActActIsda`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActBond;

impl DayCount for ActActBond {
    fn name(&self) -> &'static str {
        "ACT/ACT BOND"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        ActActIsda.year_fraction(start, end)
    }

    fn year_fraction_in_period(
        &self,
        start: Date,
        end: Date,
        ref_start: Date,
        ref_end: Date,
    ) -> f64 {
        let periods = super::nominal_periods_per_year(ref_start, ref_end);
        if periods == 0.0 {
            return 0.0;
        }
        self.period_fraction(start, end, ref_start, ref_end) / periods
    }

    fn period_fraction(&self, start: Date, end: Date, ref_start: Date, ref_end: Date) -> f64 {
        let days_in_period = ref_start.days_between(&ref_end);
        if days_in_period <= 0 {
            return 0.0;
        }
        start.days_between(&end) as f64 / days_in_period as f64
    }
}
