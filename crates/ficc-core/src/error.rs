//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by dates, calendars and day count conventions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// An identifier does not name any supported convention.
    #[error("Unsupported {kind}: '{value}'")]
    UnsupportedConvention {
        /// What kind of identifier was rejected (day count, calendar, ...).
        kind: &'static str,
        /// The rejected identifier.
        value: String,
    },

    /// Coupon frequency cannot describe a periodic schedule.
    #[error("Invalid frequency: {reason}")]
    InvalidFrequency {
        /// Description of the problem.
        reason: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an unsupported convention error.
    #[must_use]
    pub fn unsupported(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnsupportedConvention {
            kind,
            value: value.into(),
        }
    }

    /// Creates an invalid frequency error.
    #[must_use]
    pub fn invalid_frequency(reason: impl Into<String>) -> Self {
        Self::InvalidFrequency {
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }
}
