//! Cash flow projection from settlement.

use ficc_core::daycounts::DayCountConvention;
use ficc_core::types::{Date, Frequency};

use crate::error::{AnalyticsError, EngineResult};
use crate::schedule::Schedule;

/// Redemption amount per 100 face.
pub const REDEMPTION: f64 = 100.0;

/// One remaining payment per 100 face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cashflow {
    /// Unadjusted coupon date.
    pub date: Date,
    /// Adjusted payment date.
    pub payment_date: Date,
    /// Coupon plus, at maturity, redemption.
    pub amount: f64,
    /// Time from settlement in coupon periods, the exponent of `1 + y/f`.
    pub periods: f64,
}

/// The cash flows of a bond remaining after settlement.
///
/// Street convention: the first flow is discounted over the fraction of its period
/// left after settlement and each later period adds its coupon fraction. Under
/// period-based day counts a regular period pays exactly the coupon per period and
/// adds exactly one period. Under actual-day counts, and for stubs, both follow the
/// period's length in the same day count that accrues interest, so clean prices do
/// not jump across coupon dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCashflows {
    flows: Vec<Cashflow>,
    frequency: Frequency,
    coupon_per_period: f64,
}

impl ProjectedCashflows {
    /// Projects the flows of `schedule` paid after `settlement`.
    pub fn project(
        schedule: &Schedule,
        day_count: DayCountConvention,
        coupon_rate: f64,
        settlement: Date,
    ) -> EngineResult<Self> {
        let first = schedule
            .period_index(settlement)
            .ok_or(AnalyticsError::SettlementOutOfRange {
                settlement,
                issue: Some(schedule.issue_date()),
                maturity: schedule.maturity_date(),
            })?;

        let dc = day_count.to_day_count();
        let frequency = schedule.frequency();
        let coupon_per_period = coupon_rate * 100.0 / frequency.as_f64();
        let last = schedule.period_count() - 1;

        let mut periods = 0.0;
        let flows = schedule.periods()[first..]
            .iter()
            .enumerate()
            .map(|(offset, period)| {
                let coupon_fraction = period.coupon_fraction(day_count);

                periods += if offset == 0 {
                    dc.period_fraction(
                        settlement,
                        period.end,
                        period.reference_start,
                        period.reference_end,
                    )
                } else {
                    coupon_fraction
                };

                let redemption = if first + offset == last { REDEMPTION } else { 0.0 };
                Cashflow {
                    date: period.end,
                    payment_date: period.payment_date,
                    amount: coupon_per_period * coupon_fraction + redemption,
                    periods,
                }
            })
            .collect();

        Ok(Self {
            flows,
            frequency,
            coupon_per_period,
        })
    }

    /// The flows in payment order.
    #[must_use]
    pub fn flows(&self) -> &[Cashflow] {
        &self.flows
    }

    /// Coupon and compounding frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Coupon per regular period per 100 face.
    #[must_use]
    pub fn coupon_per_period(&self) -> f64 {
        self.coupon_per_period
    }

    /// Periods from settlement to maturity.
    #[must_use]
    pub fn periods_to_maturity(&self) -> f64 {
        self.flows.last().map_or(0.0, |cf| cf.periods)
    }

    /// Number of remaining flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// True if nothing remains to be paid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ficc_core::calendars::{BusinessDayAdjuster, BusinessDayConvention, NullCalendar};

    use crate::schedule::{ScheduleDirection, ScheduleGenerator};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn generator() -> ScheduleGenerator<'static> {
        ScheduleGenerator::new(
            Frequency::SemiAnnual,
            BusinessDayAdjuster::new(&NullCalendar, BusinessDayConvention::Unadjusted),
        )
    }

    #[test]
    fn test_reference_bond_flows() {
        let schedule = generator().generate(date(2020, 8, 15), date(2052, 8, 15)).unwrap();
        let flows = ProjectedCashflows::project(
            &schedule,
            DayCountConvention::ActActBond,
            0.03,
            date(2025, 6, 30),
        )
        .unwrap();

        assert_eq!(flows.len(), 55);
        let first = flows.flows()[0];
        assert_eq!(first.date, date(2025, 8, 15));
        assert_relative_eq!(first.periods, 46.0 / 181.0, epsilon = 1e-15);
        assert_relative_eq!(first.amount, 1.5);

        let second = flows.flows()[1];
        assert_relative_eq!(second.periods, 1.0 + 46.0 / 181.0, epsilon = 1e-12);

        let last = flows.flows()[54];
        assert_eq!(last.date, date(2052, 8, 15));
        assert_relative_eq!(last.amount, 101.5);
        assert_relative_eq!(flows.periods_to_maturity(), 54.0 + 46.0 / 181.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_first_coupon_is_prorated() {
        let schedule = generator().generate(date(2020, 9, 1), date(2025, 8, 15)).unwrap();
        let flows = ProjectedCashflows::project(
            &schedule,
            DayCountConvention::ActActBond,
            0.04,
            date(2020, 9, 1),
        )
        .unwrap();

        // 167 of 184 days
        assert_relative_eq!(flows.flows()[0].amount, 2.0 * 167.0 / 184.0, epsilon = 1e-12);
        assert_relative_eq!(flows.flows()[0].periods, 167.0 / 184.0, epsilon = 1e-12);
        assert_relative_eq!(flows.flows()[1].amount, 2.0);
    }

    #[test]
    fn test_back_stub_is_prorated() {
        let schedule = generator()
            .with_direction(ScheduleDirection::Forward)
            .generate(date(2025, 1, 15), date(2026, 3, 15))
            .unwrap();
        let flows = ProjectedCashflows::project(
            &schedule,
            DayCountConvention::ActActBond,
            0.06,
            date(2025, 1, 15),
        )
        .unwrap();

        // 59 of 181 days from 15 Jan to 15 Jul 2026
        let stub = 59.0 / 181.0;
        let last = flows.flows()[2];
        assert_relative_eq!(last.amount, 3.0 * stub + 100.0, epsilon = 1e-12);
        assert_relative_eq!(last.periods, 2.0 + stub, epsilon = 1e-12);
    }

    #[test]
    fn test_actual_360_coupons_follow_period_length() {
        let schedule = ScheduleGenerator::new(
            Frequency::Quarterly,
            BusinessDayAdjuster::new(&NullCalendar, BusinessDayConvention::Unadjusted),
        )
        .generate(date(2020, 1, 15), date(2030, 1, 15))
        .unwrap();
        let flows = ProjectedCashflows::project(
            &schedule,
            DayCountConvention::Act360,
            0.05,
            date(2025, 7, 15),
        )
        .unwrap();

        // 92 days to 15 Oct, then 92 days to 15 Jan
        let first = flows.flows()[0];
        assert_relative_eq!(first.amount, 1.25 * 92.0 / 90.0, epsilon = 1e-12);
        assert_relative_eq!(first.periods, 92.0 / 90.0, epsilon = 1e-12);
        let second = flows.flows()[1];
        assert_relative_eq!(second.periods, 2.0 * 92.0 / 90.0, epsilon = 1e-12);
        // 15 Jan to 15 Apr 2026 is 90 days
        assert_relative_eq!(flows.flows()[2].amount, 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_settlement_after_maturity() {
        let schedule = generator().generate(date(2020, 8, 15), date(2025, 8, 15)).unwrap();
        let result = ProjectedCashflows::project(
            &schedule,
            DayCountConvention::ActActBond,
            0.03,
            date(2025, 8, 15),
        );
        assert!(matches!(result, Err(AnalyticsError::SettlementOutOfRange { .. })));
    }
}
