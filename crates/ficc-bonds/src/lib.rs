//! # ficc Bonds
//!
//! Accrued interest, yield to maturity, duration and convexity for fixed-coupon
//! bullet bonds.
//!
//! This crate provides:
//!
//! - **Conventions**: classification to day count, business day convention,
//!   calendar and frequency, with an explicit fallback flag
//! - **Schedules**: backward or forward coupon schedules with reference periods
//! - **Accrued Interest**: against unadjusted period bounds
//! - **Pricing**: dirty price from yield, bracketed yield solve, Macaulay and
//!   modified duration, convexity, DV01
//! - **Configuration**: convention tables and solver settings from TOML or JSON
//!
//! ## Example
//!
//! ```rust
//! use ficc_bonds::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let engine = AnalyticsEngine::standard();
//! let terms = BondTerms::new(Decimal::new(3, 2), Date::from_ymd(2052, 8, 15).unwrap())
//!     .with_issue_date(Date::from_ymd(2020, 8, 15).unwrap())
//!     .with_classification("us_treasury");
//!
//! let settlement = SettlementContext::parse("2025-06-30").unwrap();
//! let result = engine.compute_analytics(&terms, &settlement, 71.66).unwrap();
//!
//! assert!((result.accrued_interest - 1.118785).abs() < 1e-6);
//! assert!(result.convexity > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod accrued;
pub mod analytics;
pub mod config;
pub mod conventions;
pub mod error;
pub mod pricing;
pub mod schedule;
pub mod settlement;
pub mod terms;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accrued::{AccruedInterest, AccruedInterestCalculator};
    pub use crate::analytics::{AnalyticsEngine, AnalyticsResult, PricePoint};
    pub use crate::config::{EngineConfig, ScheduleSettings, SolverSettings};
    pub use crate::conventions::{ConventionResolver, ConventionTable, Conventions, Resolution};
    pub use crate::error::{AnalyticsError, EngineResult};
    pub use crate::pricing::{PriceYieldEngine, ProjectedCashflows, RiskMeasures};
    pub use crate::schedule::{CouponPeriod, Schedule, ScheduleDirection, ScheduleGenerator};
    pub use crate::settlement::SettlementContext;
    pub use crate::terms::BondTerms;

    pub use ficc_core::calendars::{BusinessDayConvention, CalendarId, CalendarRegistry};
    pub use ficc_core::daycounts::DayCountConvention;
    pub use ficc_core::types::{Currency, Date, Frequency};
    pub use ficc_math::solvers::SolverMethod;
}

pub use analytics::{AnalyticsEngine, AnalyticsResult};
pub use error::{AnalyticsError, EngineResult};
pub use settlement::SettlementContext;
pub use terms::BondTerms;
