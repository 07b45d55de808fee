//! The analytics entry point.

use serde::Serialize;

use ficc_core::calendars::{Calendar, CalendarRegistry};
use ficc_core::types::Date;

use crate::accrued::{AccruedInterest, AccruedInterestCalculator};
use crate::config::EngineConfig;
use crate::conventions::{ConventionResolver, Conventions, Resolution};
use crate::error::{AnalyticsError, EngineResult};
use crate::pricing::{PriceYieldEngine, ProjectedCashflows};
use crate::schedule::{Schedule, ScheduleGenerator};
use crate::settlement::SettlementContext;
use crate::terms::BondTerms;

/// Analytics of a bond at a settlement date and clean price.
///
/// Prices and accrued interest are per 100 face. The yield is annual, in percent,
/// compounded at the coupon frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult {
    /// Accrued interest per 100 face.
    pub accrued_interest: f64,
    /// Accrued interest on the bond's face value, in currency units.
    pub accrued_amount: f64,
    /// Clean price per 100 face.
    pub clean_price: f64,
    /// Dirty price per 100 face.
    pub dirty_price: f64,
    /// Yield to maturity in percent.
    pub yield_to_maturity: f64,
    /// Macaulay duration in years.
    pub macaulay_duration: f64,
    /// Modified duration in years.
    pub modified_duration: f64,
    /// Convexity in years squared.
    pub convexity: f64,
    /// Price change per 100 face for one basis point.
    pub dv01: f64,
    /// Conventions the bond was analyzed under.
    pub conventions: Conventions,
    /// Settlement date.
    pub settlement_date: Date,
    /// Yield solver iterations.
    pub iterations: u32,
    /// True when the classification was unknown and fallback conventions were used.
    pub used_fallback: bool,
    /// True when the bond's own coupon frequency replaced the table's.
    pub frequency_overridden: bool,
    /// True when no issue date was given and a synthetic one was derived.
    pub synthetic_issue_date: bool,
}

/// Prices at a given yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    /// Clean price per 100 face.
    pub clean_price: f64,
    /// Dirty price per 100 face.
    pub dirty_price: f64,
    /// Accrued interest per 100 face.
    pub accrued_interest: f64,
}

/// Resolved conventions, schedule and cash flows of one call.
struct Prepared {
    resolution: Resolution,
    schedule: Schedule,
    accrued: AccruedInterest,
    flows: ProjectedCashflows,
}

/// Computes bond analytics from terms, settlement and price.
///
/// Immutable after construction and safe to share between threads. Nothing is
/// cached between calls.
///
/// # Example
///
/// ```rust
/// use ficc_bonds::prelude::*;
/// use rust_decimal::Decimal;
///
/// let engine = AnalyticsEngine::standard();
/// let terms = BondTerms::new(Decimal::new(3, 2), Date::from_ymd(2052, 8, 15).unwrap())
///     .with_issue_date(Date::from_ymd(2020, 8, 15).unwrap())
///     .with_classification("us_treasury");
/// let settlement = SettlementContext::on(Date::from_ymd(2025, 6, 30).unwrap());
///
/// let result = engine.compute_analytics(&terms, &settlement, 71.66).unwrap();
/// assert!((result.yield_to_maturity - 4.8992).abs() < 0.01);
/// assert!((result.modified_duration - 16.35).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    resolver: ConventionResolver,
    calendars: CalendarRegistry,
    config: EngineConfig,
    pricer: PriceYieldEngine,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl AnalyticsEngine {
    /// Builds an engine from its parts.
    pub fn new(
        resolver: ConventionResolver,
        calendars: CalendarRegistry,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        let pricer = config.solver.price_yield_engine();
        Ok(Self {
            resolver,
            calendars,
            config,
            pricer,
        })
    }

    /// The standard convention table, every built-in calendar and default settings.
    #[must_use]
    pub fn standard() -> Self {
        let config = EngineConfig::default();
        Self {
            resolver: ConventionResolver::standard(),
            calendars: CalendarRegistry::standard(),
            pricer: config.solver.price_yield_engine(),
            config,
        }
    }

    /// Builds an engine from a validated configuration over the built-in calendars.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        let resolver = ConventionResolver::new(config.convention_table()?);
        Self::new(resolver, CalendarRegistry::standard(), config)
    }

    /// Builds an engine from a TOML document.
    pub fn from_toml_str(document: &str) -> EngineResult<Self> {
        Self::from_config(EngineConfig::from_toml_str(document)?)
    }

    /// Builds an engine from a JSON document.
    pub fn from_json_str(document: &str) -> EngineResult<Self> {
        Self::from_config(EngineConfig::from_json_str(document)?)
    }

    /// Replaces the calendar registry.
    #[must_use]
    pub fn with_calendars(mut self, calendars: CalendarRegistry) -> Self {
        self.calendars = calendars;
        self
    }

    /// The convention resolver.
    #[must_use]
    pub fn resolver(&self) -> &ConventionResolver {
        &self.resolver
    }

    /// The calendar registry.
    #[must_use]
    pub fn calendars(&self) -> &CalendarRegistry {
        &self.calendars
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves the conventions of a bond.
    #[must_use]
    pub fn resolve_conventions(&self, terms: &BondTerms) -> Resolution {
        self.resolver.resolve(terms)
    }

    fn calendar(&self, conventions: &Conventions) -> EngineResult<&dyn Calendar> {
        Ok(self.calendars.get(conventions.calendar)?)
    }

    /// Settlement context for a trade, on the bond's resolved calendar.
    ///
    /// Without an explicit `lag` the currency's standard settlement lag is used. Lags
    /// over [`MAX_SETTLEMENT_LAG`](crate::settlement::MAX_SETTLEMENT_LAG) are rejected.
    pub fn settlement_context(
        &self,
        terms: &BondTerms,
        trade_date: Date,
        lag: Option<u32>,
    ) -> EngineResult<SettlementContext> {
        let conventions = self.resolver.resolve(terms).conventions;
        let calendar = self.calendar(&conventions)?;
        let lag = lag.unwrap_or_else(|| terms.currency.standard_settlement_days());
        SettlementContext::new(trade_date, lag, calendar)
    }

    /// Coupon schedule of a bond under the given conventions.
    ///
    /// `settlement` only matters when the terms have no issue date.
    pub fn schedule(
        &self,
        terms: &BondTerms,
        conventions: &Conventions,
        settlement: Date,
    ) -> EngineResult<Schedule> {
        terms.validate()?;
        let calendar = self.calendar(conventions)?;
        let generator = ScheduleGenerator::for_conventions(conventions, calendar)
            .with_direction(self.config.schedule.direction);
        match terms.issue_date {
            Some(issue) => generator.generate(issue, terms.maturity_date),
            None => generator.generate_from_settlement(terms.maturity_date, settlement),
        }
    }

    /// Accrued interest at settlement, with its breakdown.
    pub fn accrued_interest(
        &self,
        terms: &BondTerms,
        settlement: &SettlementContext,
    ) -> EngineResult<AccruedInterest> {
        Ok(self.prepare(terms, settlement)?.accrued)
    }

    /// Clean and dirty price at an annual yield given in percent.
    pub fn price_from_yield(
        &self,
        terms: &BondTerms,
        settlement: &SettlementContext,
        yield_percent: f64,
    ) -> EngineResult<PricePoint> {
        let prepared = self.prepare(terms, settlement)?;
        let accrued = prepared.accrued.amount;
        let dirty_price = self.pricer.dirty_price(&prepared.flows, yield_percent / 100.0)?;
        Ok(PricePoint {
            clean_price: dirty_price - accrued,
            dirty_price,
            accrued_interest: accrued,
        })
    }

    /// Accrued interest, yield, duration and convexity at a clean price.
    pub fn compute_analytics(
        &self,
        terms: &BondTerms,
        settlement: &SettlementContext,
        clean_price: f64,
    ) -> EngineResult<AnalyticsResult> {
        if !clean_price.is_finite() || clean_price <= 0.0 {
            return Err(AnalyticsError::invalid_input(format!(
                "clean price must be positive and finite, got {clean_price}"
            )));
        }

        let prepared = self.prepare(terms, settlement)?;
        let accrued = prepared.accrued.amount;
        let solution = self
            .pricer
            .solve_yield(&prepared.flows, clean_price, accrued)?;
        let risk = self
            .pricer
            .risk_measures(&prepared.flows, solution.annual_yield)?;

        Ok(AnalyticsResult {
            accrued_interest: accrued,
            accrued_amount: accrued * terms.face_value_f64()? / 100.0,
            clean_price,
            dirty_price: clean_price + accrued,
            yield_to_maturity: solution.annual_yield * 100.0,
            macaulay_duration: risk.macaulay_duration,
            modified_duration: risk.modified_duration,
            convexity: risk.convexity,
            dv01: risk.dv01,
            conventions: prepared.resolution.conventions,
            settlement_date: settlement.settlement_date(),
            iterations: solution.iterations,
            used_fallback: prepared.resolution.used_fallback,
            frequency_overridden: prepared.resolution.frequency_overridden,
            synthetic_issue_date: prepared.schedule.is_issue_synthetic(),
        })
    }

    fn prepare(&self, terms: &BondTerms, settlement: &SettlementContext) -> EngineResult<Prepared> {
        terms.validate()?;
        let coupon_rate = terms.coupon_rate_f64()?;
        let settlement_date = settlement.settlement_date();
        settlement.ensure_within(terms.issue_date, terms.maturity_date)?;

        let resolution = self.resolver.resolve(terms);
        let conventions = resolution.conventions;
        let schedule = self.schedule(terms, &conventions, settlement_date)?;

        let accrued = AccruedInterestCalculator::new(conventions.day_count).calculate(
            &schedule,
            coupon_rate,
            settlement_date,
        )?;
        let flows = ProjectedCashflows::project(
            &schedule,
            conventions.day_count,
            coupon_rate,
            settlement_date,
        )?;

        log::debug!(
            "{} periods, {} remaining after {settlement_date}, accrued {:.6}",
            schedule.period_count(),
            flows.len(),
            accrued.amount
        );

        Ok(Prepared {
            resolution,
            schedule,
            accrued,
            flows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ficc_core::calendars::{BusinessDayConvention, CalendarId, NullCalendar};
    use ficc_core::daycounts::DayCountConvention;
    use ficc_core::types::{Currency, Frequency};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn reference_terms() -> BondTerms {
        BondTerms::new(dec!(0.03), date(2052, 8, 15))
            .with_issue_date(date(2020, 8, 15))
            .with_classification("us_treasury")
    }

    #[test]
    fn test_reference_bond() {
        let engine = AnalyticsEngine::standard();
        let result = engine
            .compute_analytics(&reference_terms(), &SettlementContext::on(date(2025, 6, 30)), 71.66)
            .unwrap();

        assert_relative_eq!(result.accrued_interest, 1.118_784_530_386_740_3, epsilon = 1e-12);
        assert_relative_eq!(result.dirty_price, 72.778_784_530_386_74, epsilon = 1e-10);
        assert_relative_eq!(result.yield_to_maturity, 4.899_157_593_8, epsilon = 1e-6);
        assert_relative_eq!(result.modified_duration, 16.349_009_642_9, epsilon = 1e-6);
        assert_eq!(result.conventions.day_count, DayCountConvention::ActActBond);
        assert_eq!(result.settlement_date, date(2025, 6, 30));
        assert!(!result.used_fallback);
        assert!(!result.frequency_overridden);
        assert!(!result.synthetic_issue_date);
    }

    #[test]
    fn test_accrued_amount_scales_with_face() {
        let engine = AnalyticsEngine::standard();
        let terms = reference_terms().with_face_value(dec!(1_000_000));
        let result = engine
            .compute_analytics(&terms, &SettlementContext::on(date(2025, 6, 30)), 71.66)
            .unwrap();
        assert_relative_eq!(result.accrued_amount, 11_187.845_303_867_403, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_issue_date_gives_same_numbers() {
        let engine = AnalyticsEngine::standard();
        let settlement = SettlementContext::on(date(2025, 6, 30));
        let with_issue = engine
            .compute_analytics(&reference_terms(), &settlement, 71.66)
            .unwrap();

        let mut terms = reference_terms();
        terms.issue_date = None;
        let without_issue = engine.compute_analytics(&terms, &settlement, 71.66).unwrap();

        assert!(without_issue.synthetic_issue_date);
        assert_relative_eq!(without_issue.accrued_interest, with_issue.accrued_interest);
        assert_relative_eq!(
            without_issue.yield_to_maturity,
            with_issue.yield_to_maturity,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_fallback_is_flagged() {
        let engine = AnalyticsEngine::standard();
        let terms = reference_terms().with_classification("frontier_sovereign");
        let result = engine
            .compute_analytics(&terms, &SettlementContext::on(date(2025, 6, 30)), 71.66)
            .unwrap();
        assert!(result.used_fallback);
        assert_eq!(result.conventions, Conventions::fallback());
    }

    #[test]
    fn test_frequency_override_is_flagged() {
        let engine = AnalyticsEngine::standard();
        let terms = BondTerms::new(dec!(0.05), date(2030, 1, 15))
            .with_issue_date(date(2020, 1, 15))
            .with_classification("us_corporate")
            .with_frequency(Frequency::Quarterly);
        let result = engine
            .compute_analytics(&terms, &SettlementContext::on(date(2025, 6, 30)), 101.0)
            .unwrap();

        assert!(result.frequency_overridden);
        assert!(!result.used_fallback);
        assert_eq!(result.conventions.frequency, Frequency::Quarterly);
        assert_eq!(result.conventions.day_count, DayCountConvention::Thirty360US);
        // 75 of 90 days of a 1.25 quarterly coupon
        assert_relative_eq!(result.accrued_interest, 1.25 * 75.0 / 90.0, epsilon = 1e-12);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["frequency_overridden"], true);
    }

    #[test]
    fn test_settlement_out_of_range() {
        let engine = AnalyticsEngine::standard();
        for settlement in [date(2020, 8, 14), date(2052, 8, 15), date(2060, 1, 1)] {
            assert!(matches!(
                engine.compute_analytics(&reference_terms(), &SettlementContext::on(settlement), 90.0),
                Err(AnalyticsError::SettlementOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_geometry_and_inputs() {
        let engine = AnalyticsEngine::standard();
        let settlement = SettlementContext::on(date(2025, 6, 30));

        let inverted = reference_terms().with_issue_date(date(2052, 8, 15));
        assert!(matches!(
            engine.compute_analytics(&inverted, &settlement, 90.0),
            Err(AnalyticsError::InvalidScheduleGeometry { .. })
        ));

        for price in [f64::NAN, f64::INFINITY, 0.0, -5.0] {
            assert!(matches!(
                engine.compute_analytics(&reference_terms(), &settlement, price),
                Err(AnalyticsError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_missing_calendar_is_unsupported() {
        let registry = CalendarRegistry::empty().with(CalendarId::Null, Arc::new(NullCalendar));
        let engine = AnalyticsEngine::standard().with_calendars(registry);
        let err = engine
            .compute_analytics(&reference_terms(), &SettlementContext::on(date(2025, 6, 30)), 71.66)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::UnsupportedConvention { kind: "calendar", .. }
        ));
    }

    #[test]
    fn test_settlement_context_uses_currency_lag() {
        let engine = AnalyticsEngine::standard();
        // Thursday 3 July, T+1 on the US government calendar skips the 4th
        let context = engine
            .settlement_context(&reference_terms(), date(2025, 7, 3), None)
            .unwrap();
        assert_eq!(context.lag(), 1);
        assert_eq!(context.settlement_date(), date(2025, 7, 7));

        let eur = reference_terms()
            .with_classification("german_bund")
            .with_currency(Currency::EUR);
        let context = engine.settlement_context(&eur, date(2025, 7, 3), None).unwrap();
        assert_eq!(context.lag(), 2);
        assert_eq!(context.settlement_date(), date(2025, 7, 7));
    }

    #[test]
    fn test_price_from_yield_round_trip() {
        let engine = AnalyticsEngine::standard();
        let settlement = SettlementContext::on(date(2025, 6, 30));
        let result = engine
            .compute_analytics(&reference_terms(), &settlement, 71.66)
            .unwrap();
        let point = engine
            .price_from_yield(&reference_terms(), &settlement, result.yield_to_maturity)
            .unwrap();
        assert_relative_eq!(point.clean_price, 71.66, epsilon = 1e-8);
        assert_relative_eq!(point.accrued_interest, result.accrued_interest);
    }

    #[test]
    fn test_schedule_uses_resolved_calendar() {
        let engine = AnalyticsEngine::standard();
        let terms = BondTerms::new(dec!(0.05), date(2027, 2, 15))
            .with_issue_date(date(2025, 2, 15))
            .with_classification("us_corporate");
        let conventions = engine.resolve_conventions(&terms).conventions;
        assert_eq!(conventions.business_day_convention, BusinessDayConvention::Following);

        let schedule = engine.schedule(&terms, &conventions, date(2025, 6, 30)).unwrap();
        assert_eq!(schedule.periods()[1].payment_date, date(2026, 2, 17));
        assert_eq!(schedule.frequency(), Frequency::SemiAnnual);
    }

    #[test]
    fn test_from_toml_overrides_table() {
        let engine = AnalyticsEngine::from_toml_str(
            r#"
            [conventions.us_treasury]
            day_count = "30/360 US"
            calendar = "US_GOVT"
            frequency = 2
            "#,
        )
        .unwrap();
        let conventions = engine.resolve_conventions(&reference_terms()).conventions;
        assert_eq!(conventions.day_count, DayCountConvention::Thirty360US);
    }
}
