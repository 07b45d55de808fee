//! Price, yield and risk calculations.
//!
//! This module provides:
//! - [`ProjectedCashflows`]: remaining coupons and redemption, timed in coupon periods
//! - [`PriceYieldEngine`]: dirty price from yield, yield from clean price, duration
//!   and convexity under periodic compounding at the coupon frequency

mod cashflows;
mod engine;

pub use cashflows::{Cashflow, ProjectedCashflows, REDEMPTION};
pub use engine::{PriceYieldEngine, RiskMeasures, YieldSolution};
