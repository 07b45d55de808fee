//! Price/yield engine under periodic compounding.

use ficc_math::solvers::{SolverConfig, SolverMethod};

use super::cashflows::ProjectedCashflows;
use crate::error::{AnalyticsError, EngineResult};

/// Outcome of a yield solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldSolution {
    /// Annual yield as a decimal, compounded at the coupon frequency.
    pub annual_yield: f64,
    /// Solver iterations.
    pub iterations: u32,
    /// Dirty price error at the solution.
    pub residual: f64,
}

/// Duration and convexity at a yield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskMeasures {
    /// Dirty price per 100 face.
    pub dirty_price: f64,
    /// Macaulay duration in years.
    pub macaulay_duration: f64,
    /// Modified duration in years.
    pub modified_duration: f64,
    /// Convexity in years squared.
    pub convexity: f64,
    /// Price change per 100 face for a one basis point yield move.
    pub dv01: f64,
}

/// Prices projected cash flows and solves for yield.
///
/// With `f` the coupon frequency, `y` the annual yield and `t_i` the time of flow `i`
/// in coupon periods:
///
/// - dirty price `P = Σ CF_i (1 + y/f)^(-t_i)`
/// - Macaulay duration `Σ (t_i/f) PV_i / P`
/// - modified duration `Macaulay / (1 + y/f)`
/// - convexity `Σ PV_i (t_i/f)(t_i/f + 1/f) / (P (1 + y/f)²)`
///
/// The yield is searched for between the periodic bounds (`-0.5` to `1.0` by
/// default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceYieldEngine {
    method: SolverMethod,
    solver: SolverConfig,
    min_periodic_yield: f64,
    max_periodic_yield: f64,
}

impl Default for PriceYieldEngine {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            solver: SolverConfig::default(),
            min_periodic_yield: -0.5,
            max_periodic_yield: 1.0,
        }
    }
}

impl PriceYieldEngine {
    /// Engine with the default solver settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root finder.
    #[must_use]
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets tolerances and the iteration cap.
    #[must_use]
    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the periodic yield search bounds.
    #[must_use]
    pub fn with_periodic_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_periodic_yield = min;
        self.max_periodic_yield = max;
        self
    }

    /// The root finder in use.
    #[must_use]
    pub fn method(&self) -> SolverMethod {
        self.method
    }

    /// Dirty price per 100 face at an annual yield.
    pub fn dirty_price(&self, flows: &ProjectedCashflows, annual_yield: f64) -> EngineResult<f64> {
        let y = periodic_yield(flows, annual_yield)?;
        Ok(present_value(flows, y))
    }

    /// Clean price per 100 face at an annual yield.
    pub fn clean_price(
        &self,
        flows: &ProjectedCashflows,
        annual_yield: f64,
        accrued: f64,
    ) -> EngineResult<f64> {
        Ok(self.dirty_price(flows, annual_yield)? - accrued)
    }

    /// Solves `dirty(y) - accrued = clean_price` for the annual yield.
    ///
    /// A price with no yield inside the search bounds, or a solve that runs out of
    /// iterations, fails with `YieldSolverDidNotConverge`; its `last_estimate` is an
    /// annual yield in percent.
    pub fn solve_yield(
        &self,
        flows: &ProjectedCashflows,
        clean_price: f64,
        accrued: f64,
    ) -> EngineResult<YieldSolution> {
        if !clean_price.is_finite() {
            return Err(AnalyticsError::invalid_input(format!(
                "clean price must be finite, got {clean_price}"
            )));
        }
        if flows.is_empty() {
            return Err(AnalyticsError::invalid_input("no cash flows left after settlement"));
        }

        let f = flows.frequency().as_f64();
        let target = clean_price + accrued;
        let objective = |y: f64| present_value(flows, y) - target;
        let derivative = |y: f64| pv_derivative(flows, y);
        let guess = initial_guess(flows, target);

        match self.method.solve(
            objective,
            derivative,
            self.min_periodic_yield,
            self.max_periodic_yield,
            guess,
            &self.solver,
        ) {
            Ok(result) => {
                log::debug!(
                    "{} solved yield {:.10}% in {} iterations (residual {:.3e})",
                    self.method,
                    result.root * f * 100.0,
                    result.iterations,
                    result.residual
                );
                Ok(YieldSolution {
                    annual_yield: result.root * f,
                    iterations: result.iterations,
                    residual: result.residual,
                })
            }
            Err(err) => {
                let err = match AnalyticsError::from(err) {
                    AnalyticsError::YieldSolverDidNotConverge {
                        last_estimate,
                        iterations,
                        residual,
                    } => AnalyticsError::YieldSolverDidNotConverge {
                        last_estimate: last_estimate * f * 100.0,
                        iterations,
                        residual,
                    },
                    other => other,
                };
                log::warn!("yield solve for dirty price {target} failed: {err}");
                Err(err)
            }
        }
    }

    /// Duration, convexity and DV01 at an annual yield.
    pub fn risk_measures(
        &self,
        flows: &ProjectedCashflows,
        annual_yield: f64,
    ) -> EngineResult<RiskMeasures> {
        let y = periodic_yield(flows, annual_yield)?;
        let f = flows.frequency().as_f64();
        let base = 1.0 + y;

        let mut price = 0.0;
        let mut weighted_time = 0.0;
        let mut weighted_convexity = 0.0;
        for cf in flows.flows() {
            let pv = cf.amount * base.powf(-cf.periods);
            let years = cf.periods / f;
            price += pv;
            weighted_time += years * pv;
            weighted_convexity += pv * years * (years + 1.0 / f);
        }

        if price <= 0.0 {
            return Err(AnalyticsError::invalid_input(format!(
                "dirty price {price} at yield {annual_yield} is not positive"
            )));
        }

        let macaulay_duration = weighted_time / price;
        let modified_duration = macaulay_duration / base;
        Ok(RiskMeasures {
            dirty_price: price,
            macaulay_duration,
            modified_duration,
            convexity: weighted_convexity / (price * base * base),
            dv01: modified_duration * price / 10_000.0,
        })
    }
}

fn periodic_yield(flows: &ProjectedCashflows, annual_yield: f64) -> EngineResult<f64> {
    let y = annual_yield / flows.frequency().as_f64();
    if !y.is_finite() || y <= -1.0 {
        return Err(AnalyticsError::invalid_input(format!(
            "yield {annual_yield} is not usable at {} compounding",
            flows.frequency()
        )));
    }
    Ok(y)
}

fn present_value(flows: &ProjectedCashflows, y: f64) -> f64 {
    let base = 1.0 + y;
    flows
        .flows()
        .iter()
        .map(|cf| cf.amount * base.powf(-cf.periods))
        .sum()
}

fn pv_derivative(flows: &ProjectedCashflows, y: f64) -> f64 {
    let base = 1.0 + y;
    flows
        .flows()
        .iter()
        .map(|cf| -cf.periods * cf.amount * base.powf(-cf.periods - 1.0))
        .sum()
}

/// Periodic yield-to-maturity approximation used to start Newton.
fn initial_guess(flows: &ProjectedCashflows, dirty_price: f64) -> f64 {
    let n = flows.periods_to_maturity();
    let coupon = flows.coupon_per_period();
    if n > 0.0 && dirty_price > 0.0 {
        (coupon + (super::REDEMPTION - dirty_price) / n) / ((super::REDEMPTION + dirty_price) / 2.0)
    } else {
        coupon / super::REDEMPTION
    }
}
