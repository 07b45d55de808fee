//! Coupon schedule generation.
//!
//! Schedules are rolled from an anchor date in whole coupon periods:
//!
//! - **Backward** (default): anchored on maturity, down to the quasi-coupon date on
//!   or before issue. Every period is regular; a short first coupon accrues from
//!   issue against its full reference period.
//! - **Forward**: anchored on issue, up to maturity. The last period may be a short
//!   back stub whose reference period is the notional regular period starting on
//!   the same date.
//!
//! Step `k` is always `anchor ± k` periods, so month-end clamping never drifts.
//!
//! # Example
//!
//! ```rust
//! use ficc_bonds::schedule::ScheduleGenerator;
//! use ficc_core::calendars::{BusinessDayAdjuster, BusinessDayConvention, NullCalendar};
//! use ficc_core::{Date, Frequency};
//!
//! let adjuster = BusinessDayAdjuster::new(&NullCalendar, BusinessDayConvention::Unadjusted);
//! let schedule = ScheduleGenerator::new(Frequency::SemiAnnual, adjuster)
//!     .generate(Date::from_ymd(2020, 8, 15).unwrap(), Date::from_ymd(2052, 8, 15).unwrap())
//!     .unwrap();
//!
//! assert_eq!(schedule.period_count(), 64);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use ficc_core::calendars::{BusinessDayAdjuster, Calendar};
use ficc_core::daycounts::DayCountConvention;
use ficc_core::types::{Date, Frequency};

use crate::conventions::Conventions;
use crate::error::{AnalyticsError, EngineResult};

/// Which end of the bond the schedule is rolled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleDirection {
    /// Roll back from maturity.
    #[default]
    Backward,
    /// Roll forward from issue.
    Forward,
}

impl fmt::Display for ScheduleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDirection::Backward => f.write_str("backward"),
            ScheduleDirection::Forward => f.write_str("forward"),
        }
    }
}

/// One coupon period. All bounds are unadjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CouponPeriod {
    /// Unadjusted period start (may precede issue in the first period).
    pub start: Date,
    /// Unadjusted period end, the coupon date.
    pub end: Date,
    /// Date interest starts accruing: the later of `start` and issue.
    pub accrual_start: Date,
    /// Start of the notional regular period the fractions are measured against.
    pub reference_start: Date,
    /// End of the notional regular period.
    pub reference_end: Date,
    /// `end` after business day adjustment.
    pub payment_date: Date,
}

impl CouponPeriod {
    /// True when the period accrues over its whole reference period.
    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.accrual_start == self.reference_start && self.end == self.reference_end
    }

    /// True if `date` falls in `[accrual_start, end)`.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.accrual_start <= date && date < self.end
    }

    /// Share of a full coupon this period pays under `day_count`.
    ///
    /// Regular periods pay exactly one coupon under period-based day counts. Under
    /// actual-day counts, and for stubs, the period is measured from accrual start to
    /// end against its reference period, the same way accrued interest is.
    #[must_use]
    pub fn coupon_fraction(&self, day_count: DayCountConvention) -> f64 {
        if self.is_regular() && day_count.is_period_based() {
            return 1.0;
        }
        day_count.to_day_count().period_fraction(
            self.accrual_start,
            self.end,
            self.reference_start,
            self.reference_end,
        )
    }
}

/// A generated coupon schedule.
///
/// Boundary dates are strictly increasing; the last one is maturity and the first
/// is on or before the issue date.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    dates: Vec<Date>,
    periods: Vec<CouponPeriod>,
    issue_date: Date,
    maturity_date: Date,
    synthetic_issue: bool,
    frequency: Frequency,
    direction: ScheduleDirection,
}

impl Schedule {
    /// Unadjusted boundary dates, first period start to maturity.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Adjusted coupon payment dates, one per period.
    #[must_use]
    pub fn payment_dates(&self) -> Vec<Date> {
        self.periods.iter().map(|p| p.payment_date).collect()
    }

    /// The coupon periods in order.
    #[must_use]
    pub fn periods(&self) -> &[CouponPeriod] {
        &self.periods
    }

    /// Number of coupon periods.
    #[must_use]
    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    /// Issue date the schedule accrues from.
    #[must_use]
    pub fn issue_date(&self) -> Date {
        self.issue_date
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// True when no issue date was known and the quasi-coupon date before
    /// settlement stands in for it.
    #[must_use]
    pub fn is_issue_synthetic(&self) -> bool {
        self.synthetic_issue
    }

    /// Coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Direction the schedule was rolled in.
    #[must_use]
    pub fn direction(&self) -> ScheduleDirection {
        self.direction
    }

    /// Index of the period whose `[accrual_start, end)` contains `date`.
    #[must_use]
    pub fn period_index(&self, date: Date) -> Option<usize> {
        let index = self.periods.partition_point(|p| p.end <= date);
        self.periods
            .get(index)
            .filter(|period| period.contains(date))
            .map(|_| index)
    }

    /// The period containing `date`.
    #[must_use]
    pub fn period_containing(&self, date: Date) -> Option<&CouponPeriod> {
        self.period_index(date).map(|i| &self.periods[i])
    }
}

/// Builds [`Schedule`]s for one set of conventions.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleGenerator<'a> {
    frequency: Frequency,
    adjuster: BusinessDayAdjuster<'a>,
    end_of_month: bool,
    direction: ScheduleDirection,
}

impl<'a> ScheduleGenerator<'a> {
    /// Backward generator with the end-of-month rule enabled.
    #[must_use]
    pub fn new(frequency: Frequency, adjuster: BusinessDayAdjuster<'a>) -> Self {
        Self {
            frequency,
            adjuster,
            end_of_month: true,
            direction: ScheduleDirection::Backward,
        }
    }

    /// Generator for resolved conventions on the given calendar.
    #[must_use]
    pub fn for_conventions(conventions: &Conventions, calendar: &'a dyn Calendar) -> Self {
        Self::new(
            conventions.frequency,
            BusinessDayAdjuster::new(calendar, conventions.business_day_convention),
        )
        .with_end_of_month(conventions.end_of_month)
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn with_end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Sets the roll direction.
    #[must_use]
    pub fn with_direction(mut self, direction: ScheduleDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Generates the schedule of a bond issued on `issue` maturing on `maturity`.
    pub fn generate(&self, issue: Date, maturity: Date) -> EngineResult<Schedule> {
        if issue >= maturity {
            return Err(AnalyticsError::invalid_geometry(format!(
                "issue date {issue} is not before maturity {maturity}"
            )));
        }

        let schedule = match self.direction {
            ScheduleDirection::Backward => {
                let dates = self.roll_back(maturity, issue)?;
                self.assemble(dates, None, issue, maturity, false)
            }
            ScheduleDirection::Forward => {
                let (dates, stub_reference_end) = self.roll_forward(issue, maturity)?;
                self.assemble(dates, Some(stub_reference_end), issue, maturity, false)
            }
        };
        log::debug!(
            "{} schedule {issue}..{maturity} ({}): {} periods",
            self.direction,
            self.frequency,
            schedule.period_count()
        );
        Ok(schedule)
    }

    /// Generates the schedule of a bond with no known issue date.
    ///
    /// Rolls back from maturity to the quasi-coupon date on or before `settlement`,
    /// which becomes the synthetic issue date. Always backward.
    pub fn generate_from_settlement(&self, maturity: Date, settlement: Date) -> EngineResult<Schedule> {
        if settlement >= maturity {
            return Err(AnalyticsError::invalid_geometry(format!(
                "settlement {settlement} is not before maturity {maturity}"
            )));
        }
        let dates = self.roll_back(maturity, settlement)?;
        let issue = dates[0];
        log::debug!("no issue date; using quasi-coupon date {issue} as synthetic issue");
        Ok(self.assemble(dates, None, issue, maturity, true))
    }

    fn step(&self, anchor: Date, periods: i32, month_end: bool) -> EngineResult<Date> {
        let months = periods * self.frequency.months_per_period() as i32;
        let date = anchor.add_months(months).map_err(|err| {
            AnalyticsError::invalid_geometry(format!("cannot roll {anchor} by {months} months: {err}"))
        })?;
        Ok(if month_end { date.end_of_month() } else { date })
    }

    /// Dates from the last one on or before `floor` up to `maturity`, ascending.
    fn roll_back(&self, maturity: Date, floor: Date) -> EngineResult<Vec<Date>> {
        let month_end = self.end_of_month && maturity.is_end_of_month();
        let mut dates = vec![maturity];
        let mut k = 1;
        loop {
            let date = self.step(maturity, -k, month_end)?;
            dates.push(date);
            if date <= floor {
                break;
            }
            k += 1;
        }
        dates.reverse();
        Ok(dates)
    }

    /// Dates from `issue` to `maturity` plus the notional end of the last period.
    fn roll_forward(&self, issue: Date, maturity: Date) -> EngineResult<(Vec<Date>, Date)> {
        let month_end = self.end_of_month && issue.is_end_of_month();
        let mut dates = vec![issue];
        let mut k = 1;
        loop {
            let date = self.step(issue, k, month_end)?;
            if date >= maturity {
                dates.push(maturity);
                return Ok((dates, date));
            }
            dates.push(date);
            k += 1;
        }
    }

    fn assemble(
        &self,
        dates: Vec<Date>,
        stub_reference_end: Option<Date>,
        issue: Date,
        maturity: Date,
        synthetic_issue: bool,
    ) -> Schedule {
        let last = dates.len().saturating_sub(2);
        let periods = dates
            .windows(2)
            .enumerate()
            .map(|(i, bounds)| {
                let (start, end) = (bounds[0], bounds[1]);
                let reference_end = match stub_reference_end {
                    Some(notional) if i == last => notional,
                    _ => end,
                };
                CouponPeriod {
                    start,
                    end,
                    accrual_start: start.max(issue),
                    reference_start: start,
                    reference_end,
                    payment_date: self.adjuster.adjust(end),
                }
            })
            .collect();

        Schedule {
            dates,
            periods,
            issue_date: issue,
            maturity_date: maturity,
            synthetic_issue,
            frequency: self.frequency,
            direction: self.direction,
        }
    }
}
