//! Error types for bond analytics.

use thiserror::Error;

use ficc_core::{CoreError, Date};
use ficc_math::MathError;

/// A specialized Result type for the analytics engine.
pub type EngineResult<T> = Result<T, AnalyticsError>;

/// Errors returned by convention resolution, schedule generation and the
/// price/yield engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// An identifier names no supported day count, calendar, frequency or
    /// business day convention, or a calendar is missing from the registry.
    #[error("Unsupported {kind}: '{value}'")]
    UnsupportedConvention {
        /// What kind of identifier was rejected.
        kind: &'static str,
        /// The rejected identifier.
        value: String,
    },

    /// Settlement does not fall inside `[issue, maturity)`.
    #[error("Settlement {settlement} is outside [{}, {maturity})", lower_bound(.issue.as_ref()))]
    SettlementOutOfRange {
        /// The settlement date.
        settlement: Date,
        /// First accrual date, if known.
        issue: Option<Date>,
        /// Maturity date.
        maturity: Date,
    },

    /// The yield solve failed or the price has no yield inside the search bounds.
    #[error(
        "Yield solver did not converge after {iterations} iterations (last estimate {last_estimate}%, residual {residual:.3e})"
    )]
    YieldSolverDidNotConverge {
        /// Best annualized yield, in percent, reached before giving up.
        last_estimate: f64,
        /// Iterations used.
        iterations: u32,
        /// Dirty price error at the last estimate.
        residual: f64,
    },

    /// Dates or frequency cannot form a coupon schedule.
    #[error("Invalid schedule geometry: {reason}")]
    InvalidScheduleGeometry {
        /// Description of the problem.
        reason: String,
    },

    /// A numeric input is unusable.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the problem.
        reason: String,
    },

    /// A configuration document is malformed or inconsistent.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the problem.
        reason: String,
    },
}

fn lower_bound(issue: Option<&Date>) -> String {
    issue.map_or_else(|| "..".to_string(), Date::to_string)
}

impl AnalyticsError {
    /// Creates an unsupported convention error.
    #[must_use]
    pub fn unsupported(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnsupportedConvention {
            kind,
            value: value.into(),
        }
    }

    /// Creates an invalid schedule geometry error.
    #[must_use]
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidScheduleGeometry {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for AnalyticsError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedConvention { kind, value } => {
                Self::UnsupportedConvention { kind, value }
            }
            CoreError::InvalidFrequency { reason } => Self::InvalidScheduleGeometry { reason },
            CoreError::InvalidDate { message } => Self::InvalidInput { reason: message },
            CoreError::CalendarError { reason } => Self::InvalidInput { reason },
        }
    }
}

impl From<MathError> for AnalyticsError {
    /// Maps solver failures without rescaling: `last_estimate` is whatever unit the
    /// solved function used.
    fn from(err: MathError) -> Self {
        match err {
            MathError::ConvergenceFailed {
                iterations,
                residual,
                last_estimate,
            } => Self::YieldSolverDidNotConverge {
                last_estimate,
                iterations,
                residual,
            },
            MathError::InvalidBracket { a, b, fa, fb } => {
                let (last_estimate, residual) = if fa.abs() <= fb.abs() { (a, fa) } else { (b, fb) };
                Self::YieldSolverDidNotConverge {
                    last_estimate,
                    iterations: 0,
                    residual,
                }
            }
            MathError::InvalidInput { reason } => Self::Config { reason },
        }
    }
}

impl From<toml::de::Error> for AnalyticsError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_engine_kinds() {
        let err: AnalyticsError = CoreError::unsupported("calendar", "MARS").into();
        assert_eq!(err, AnalyticsError::unsupported("calendar", "MARS"));

        let err: AnalyticsError = CoreError::invalid_frequency("zero").into();
        assert!(matches!(err, AnalyticsError::InvalidScheduleGeometry { .. }));
    }

    #[test]
    fn test_invalid_bracket_reports_closer_end() {
        let err: AnalyticsError = MathError::invalid_bracket(-0.5, 1.0, 30.0, 2.0).into();
        match err {
            AnalyticsError::YieldSolverDidNotConverge {
                last_estimate,
                iterations,
                residual,
            } => {
                assert_eq!(last_estimate, 1.0);
                assert_eq!(iterations, 0);
                assert_eq!(residual, 2.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_settlement_display() {
        let err = AnalyticsError::SettlementOutOfRange {
            settlement: Date::from_ymd(2053, 1, 1).unwrap(),
            issue: Some(Date::from_ymd(2020, 8, 15).unwrap()),
            maturity: Date::from_ymd(2052, 8, 15).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Settlement 2053-01-01 is outside [2020-08-15, 2052-08-15)"
        );

        let open = AnalyticsError::SettlementOutOfRange {
            settlement: Date::from_ymd(2053, 1, 1).unwrap(),
            issue: None,
            maturity: Date::from_ymd(2052, 8, 15).unwrap(),
        };
        assert_eq!(open.to_string(), "Settlement 2053-01-01 is outside [.., 2052-08-15)");
    }
}
