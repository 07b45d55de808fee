//! Engine configuration documents (TOML or JSON).
//!
//! ```toml
//! [solver]
//! method = "brent"
//! max_iterations = 200
//!
//! [schedule]
//! direction = "backward"
//!
//! [conventions.cad_provincial]
//! day_count = "ACT/365F"
//! business_day_convention = "following"
//! frequency = 2
//! calendar = "WEEKEND"
//! ```
//!
//! Every section and field is optional. Convention entries extend or override
//! [`ConventionTable::standard`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ficc_math::solvers::{SolverConfig, SolverMethod};

use crate::conventions::{ConventionEntry, ConventionTable};
use crate::error::{AnalyticsError, EngineResult};
use crate::pricing::PriceYieldEngine;
use crate::schedule::ScheduleDirection;

/// Largest accepted yield tolerance.
pub const MAX_YIELD_TOLERANCE: f64 = 1e-8;

/// `[solver]` section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSettings {
    /// Root finder.
    pub method: SolverMethod,
    /// Converged once the dirty price error is at or below this.
    pub price_tolerance: f64,
    /// Converged once the periodic yield step is at or below this.
    pub yield_tolerance: f64,
    /// Iteration cap.
    pub max_iterations: u32,
    /// Lower periodic yield bound.
    pub min_periodic_yield: f64,
    /// Upper periodic yield bound.
    pub max_periodic_yield: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            method: SolverMethod::Newton,
            price_tolerance: 1e-10,
            yield_tolerance: 1e-12,
            max_iterations: 100,
            min_periodic_yield: -0.5,
            max_periodic_yield: 1.0,
        }
    }
}

impl SolverSettings {
    /// Root finder configuration.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.price_tolerance, self.max_iterations)
            .with_x_tolerance(self.yield_tolerance)
    }

    /// A [`PriceYieldEngine`] using these settings.
    #[must_use]
    pub fn price_yield_engine(&self) -> PriceYieldEngine {
        PriceYieldEngine::new()
            .with_method(self.method)
            .with_solver_config(self.solver_config())
            .with_periodic_bounds(self.min_periodic_yield, self.max_periodic_yield)
    }

    fn validate(&self) -> EngineResult<()> {
        self.solver_config()
            .validate()
            .map_err(|err| AnalyticsError::config(format!("solver: {err}")))?;
        if self.yield_tolerance > MAX_YIELD_TOLERANCE {
            return Err(AnalyticsError::config(format!(
                "solver: yield_tolerance {} exceeds {MAX_YIELD_TOLERANCE}",
                self.yield_tolerance
            )));
        }
        let (lo, hi) = (self.min_periodic_yield, self.max_periodic_yield);
        if !(lo.is_finite() && hi.is_finite() && lo > -1.0 && lo < hi) {
            return Err(AnalyticsError::config(format!(
                "solver: periodic yield bounds [{lo}, {hi}] must satisfy -1 < min < max"
            )));
        }
        Ok(())
    }
}

/// `[schedule]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSettings {
    /// Roll direction.
    pub direction: ScheduleDirection,
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Yield solver settings.
    pub solver: SolverSettings,
    /// Schedule settings.
    pub schedule: ScheduleSettings,
    /// Convention table entries keyed by classification.
    pub conventions: BTreeMap<String, ConventionEntry>,
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(document: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(document: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks solver settings and every convention entry.
    ///
    /// Unknown convention identifiers fail with `UnsupportedConvention`, everything
    /// else with `Config`.
    pub fn validate(&self) -> EngineResult<()> {
        self.solver.validate()?;
        for (classification, entry) in &self.conventions {
            entry.to_conventions().map_err(|err| match err {
                AnalyticsError::UnsupportedConvention { .. } => err,
                other => AnalyticsError::config(format!("conventions.{classification}: {other}")),
            })?;
        }
        Ok(())
    }

    /// The standard table with this document's entries applied on top.
    pub fn convention_table(&self) -> EngineResult<ConventionTable> {
        let overrides = ConventionTable::from_entries(&self.conventions)?;
        Ok(ConventionTable::standard().merged_with(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ficc_core::calendars::CalendarId;
    use ficc_core::daycounts::DayCountConvention;
    use ficc_core::types::Frequency;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.solver.max_iterations, 100);
        assert_eq!(config.schedule.direction, ScheduleDirection::Backward);
        assert_eq!(config.convention_table().unwrap(), ConventionTable::standard());
    }

    #[test]
    fn test_partial_solver_section() {
        let config = EngineConfig::from_toml_str(
            r#"
            [solver]
            method = "brent"
            max_iterations = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.solver.method, SolverMethod::Brent);
        assert_eq!(config.solver.max_iterations, 50);
        assert_eq!(config.solver.price_tolerance, 1e-10);
    }

    #[test]
    fn test_json_document() {
        let config = EngineConfig::from_json_str(
            r#"{
                "schedule": {"direction": "forward"},
                "conventions": {"Asia Dollar": {"day_count": "30/360", "frequency": "semiannual", "calendar": "SIFMA"}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.schedule.direction, ScheduleDirection::Forward);

        let table = config.convention_table().unwrap();
        let asia = table.get("asia_dollar").unwrap();
        assert_eq!(asia.day_count, DayCountConvention::Thirty360US);
        assert_eq!(asia.calendar, CalendarId::UsGovernment);
        assert_eq!(asia.frequency, Frequency::SemiAnnual);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = EngineConfig::from_toml_str("[solver]\nmethd = \"brent\"\n").unwrap_err();
        assert!(matches!(err, AnalyticsError::Config { .. }));
    }

    #[test]
    fn test_rejects_bad_settings() {
        for document in [
            "[solver]\nmax_iterations = 0\n",
            "[solver]\nprice_tolerance = -1.0\n",
            "[solver]\nyield_tolerance = 1e-4\n",
            "[solver]\nmin_periodic_yield = 0.5\nmax_periodic_yield = 0.1\n",
            "[solver]\nmin_periodic_yield = -1.5\n",
        ] {
            assert!(
                matches!(EngineConfig::from_toml_str(document), Err(AnalyticsError::Config { .. })),
                "accepted {document:?}"
            );
        }
    }

    #[test]
    fn test_rejects_unknown_convention_names() {
        let err = EngineConfig::from_toml_str("[conventions.odd]\nday_count = \"ACT/999\"\n")
            .unwrap_err();
        assert_eq!(err, AnalyticsError::unsupported("day count", "ACT/999"));

        let err = EngineConfig::from_toml_str(
            "[conventions.odd]\nday_count = \"ACT/360\"\nfrequency = 3\n",
        )
        .unwrap_err();
        match err {
            AnalyticsError::Config { reason } => assert!(reason.contains("conventions.odd")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
