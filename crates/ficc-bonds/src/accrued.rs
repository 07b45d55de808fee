//! Accrued interest at settlement.

use ficc_core::daycounts::DayCountConvention;
use ficc_core::types::Date;

use crate::error::{AnalyticsError, EngineResult};
use crate::schedule::{CouponPeriod, Schedule};

/// Accrued interest and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccruedInterest {
    /// Accrued interest per 100 face.
    pub amount: f64,
    /// Coupon per regular period per 100 face.
    pub coupon_per_period: f64,
    /// Coupon paid at the end of `period` per 100 face.
    pub period_coupon: f64,
    /// Fraction of the reference period accrued.
    pub fraction: f64,
    /// Days accrued under the day count.
    pub accrued_days: i64,
    /// Period bracketing the settlement date.
    pub period: CouponPeriod,
}

/// Computes accrued interest from a schedule.
///
/// Accrual uses unadjusted period bounds, starts at the later of the period start
/// and issue, and is measured against the period's reference period.
///
/// # Example
///
/// ```rust
/// use ficc_bonds::accrued::AccruedInterestCalculator;
/// use ficc_bonds::schedule::ScheduleGenerator;
/// use ficc_core::calendars::{BusinessDayAdjuster, BusinessDayConvention, NullCalendar};
/// use ficc_core::daycounts::DayCountConvention;
/// use ficc_core::{Date, Frequency};
///
/// let adjuster = BusinessDayAdjuster::new(&NullCalendar, BusinessDayConvention::Unadjusted);
/// let schedule = ScheduleGenerator::new(Frequency::SemiAnnual, adjuster)
///     .generate(Date::from_ymd(2020, 8, 15).unwrap(), Date::from_ymd(2052, 8, 15).unwrap())
///     .unwrap();
///
/// let accrued = AccruedInterestCalculator::new(DayCountConvention::ActActBond)
///     .calculate(&schedule, 0.03, Date::from_ymd(2025, 6, 30).unwrap())
///     .unwrap();
/// assert_eq!(accrued.accrued_days, 135);
/// assert!((accrued.amount - 1.5 * 135.0 / 181.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccruedInterestCalculator {
    day_count: DayCountConvention,
}

impl AccruedInterestCalculator {
    /// Creates a calculator for a day count convention.
    #[must_use]
    pub fn new(day_count: DayCountConvention) -> Self {
        Self { day_count }
    }

    /// The day count in use.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Coupon per period per 100 face for an annual `coupon_rate`.
    #[must_use]
    pub fn coupon_per_period(schedule: &Schedule, coupon_rate: f64) -> f64 {
        coupon_rate * 100.0 / schedule.frequency().as_f64()
    }

    /// Accrued interest per 100 face at `settlement`.
    ///
    /// Fails with `SettlementOutOfRange` if no period of the schedule contains the
    /// settlement date.
    pub fn calculate(
        &self,
        schedule: &Schedule,
        coupon_rate: f64,
        settlement: Date,
    ) -> EngineResult<AccruedInterest> {
        let period = schedule
            .period_containing(settlement)
            .copied()
            .ok_or(AnalyticsError::SettlementOutOfRange {
                settlement,
                issue: Some(schedule.issue_date()),
                maturity: schedule.maturity_date(),
            })?;

        let dc = self.day_count.to_day_count();
        let fraction = dc.period_fraction(
            period.accrual_start,
            settlement,
            period.reference_start,
            period.reference_end,
        );
        let coupon_per_period = Self::coupon_per_period(schedule, coupon_rate);

        Ok(AccruedInterest {
            amount: coupon_per_period * fraction,
            coupon_per_period,
            period_coupon: coupon_per_period * period.coupon_fraction(self.day_count),
            fraction,
            accrued_days: dc.day_count(period.accrual_start, settlement),
            period,
        })
    }
}
