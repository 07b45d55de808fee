//! Day count conventions for fixed income calculations.
//!
//! A day count convention turns a pair of dates into a year fraction, and inside a
//! coupon period into a fraction of that period. The same convention must drive
//! accrued interest, coupon amounts and discounting exponents.
//!
//! # Supported Conventions
//!
//! - [`ActActBond`]: Actual/Actual (Bond, ICMA) - government bonds
//! - [`ActActIsda`]: Actual/Actual ISDA - calendar-year split
//! - [`Thirty360US`]: 30/360 US (Bond Basis) - US corporates, agencies, munis
//! - [`Thirty360E`]: 30E/360 (Eurobond Basis)
//! - [`Act360`]: Actual/360 - money market
//! - [`Act365Fixed`]: Actual/365 Fixed
//!
//! # Usage
//!
//! ```rust
//! use ficc_core::daycounts::{DayCount, Thirty360US};
//! use ficc_core::types::Date;
//!
//! let dc = Thirty360US;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 180);
//! assert_eq!(dc.year_fraction(start, end), 0.5);
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::{ActActBond, ActActIsda};
pub use thirty360::{Thirty360E, Thirty360US};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Fractions are negative when `end` precedes `start`. Implementations are
/// stateless and thread-safe.
pub trait DayCount: Send + Sync {
    /// Returns the market name of the convention (e.g. "ACT/360", "30/360 US").
    fn name(&self) -> &'static str;

    /// Day count between two dates under the convention.
    ///
    /// Actual calendar days for ACT conventions, 30-day months for 30/360.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction between two dates.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Year fraction between two dates lying in the coupon period
    /// `[ref_start, ref_end]`.
    ///
    /// Only period-based conventions use the reference period.
    fn year_fraction_in_period(
        &self,
        start: Date,
        end: Date,
        _ref_start: Date,
        _ref_end: Date,
    ) -> f64 {
        self.year_fraction(start, end)
    }

    /// Fraction of the coupon period `[ref_start, ref_end]` covered by
    /// `[start, end]`.
    ///
    /// A full regular period is 1 for period-based conventions. For the others it is
    /// the year fraction scaled by the reference period's nominal periods per year.
    fn period_fraction(&self, start: Date, end: Date, ref_start: Date, ref_end: Date) -> f64 {
        self.year_fraction(start, end) * nominal_periods_per_year(ref_start, ref_end)
    }

    /// Fraction of the coupon `[period_start, period_end]` accrued at `settlement`.
    fn accrued_fraction(&self, period_start: Date, period_end: Date, settlement: Date) -> f64 {
        self.period_fraction(period_start, settlement, period_start, period_end)
    }
}

/// Coupon periods per year implied by a regular reference period
/// (12 over its length in whole months).
#[must_use]
pub fn nominal_periods_per_year(ref_start: Date, ref_end: Date) -> f64 {
    let months = ref_start.months_between(&ref_end);
    if months > 0 {
        12.0 / f64::from(months)
    } else {
        let days = ref_start.days_between(&ref_end);
        if days > 0 {
            365.0 / days as f64
        } else {
            0.0
        }
    }
}

/// Closed set of supported day count conventions.
///
/// The engine carries this enum; strings are only parsed at the configuration
/// boundary through [`FromStr`].
///
/// # Example
///
/// ```rust
/// use ficc_core::daycounts::DayCountConvention;
///
/// let convention: DayCountConvention = "ACT/ACT ICMA".parse().unwrap();
/// assert_eq!(convention, DayCountConvention::ActActBond);
/// assert_eq!(convention.to_day_count().name(), "ACT/ACT BOND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/Actual (Bond, ICMA): actual days over actual days in the coupon period.
    #[default]
    ActActBond,
    /// Actual/Actual ISDA: actual days split by calendar year over 365 or 366.
    ActActIsda,
    /// 30/360 US (Bond Basis) with the February end-of-month rules.
    Thirty360US,
    /// 30E/360 (Eurobond Basis).
    Thirty360E,
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    Act365Fixed,
}

impl DayCountConvention {
    /// Returns the stateless implementation of this convention.
    #[must_use]
    pub fn to_day_count(&self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::ActActBond => &ActActBond,
            DayCountConvention::ActActIsda => &ActActIsda,
            DayCountConvention::Thirty360US => &Thirty360US,
            DayCountConvention::Thirty360E => &Thirty360E,
            DayCountConvention::Act360 => &Act360,
            DayCountConvention::Act365Fixed => &Act365Fixed,
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.to_day_count().name()
    }

    /// True if a regular coupon period counts as exactly one period.
    ///
    /// Actual-day conventions (ACT/360, ACT/365F, ACT/ACT ISDA) measure each period
    /// by its calendar days instead, so their coupons vary with period length.
    #[must_use]
    pub fn is_period_based(&self) -> bool {
        matches!(
            self,
            DayCountConvention::ActActBond
                | DayCountConvention::Thirty360US
                | DayCountConvention::Thirty360E
        )
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::ActActBond,
            DayCountConvention::ActActIsda,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
        ]
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    /// Accepts market names ("ACT/360", "30/360 US", "ACT/ACT ICMA"), enum-style names
    /// ("ActActBond") and common aliases ("BOND", "EUROBOND").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['.', '_', '-'], " ");
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        match normalized.as_str() {
            "ACT/ACT BOND" | "ACT/ACT ICMA" | "ACT/ACT ISMA" | "ACTUAL/ACTUAL BOND"
            | "ACTUALACTUAL BOND" | "ACTUAL/ACTUAL ICMA" | "ACTACTBOND" | "ACTACTICMA" | "ISMA"
            | "ICMA" => Ok(DayCountConvention::ActActBond),

            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTUAL/ACTUAL ISDA"
            | "ACTUALACTUAL ISDA" | "ACTACTISDA" => Ok(DayCountConvention::ActActIsda),

            "30/360" | "30/360 US" | "30U/360" | "BOND" | "BOND BASIS" | "THIRTY360US" => {
                Ok(DayCountConvention::Thirty360US)
            }

            "30E/360" | "30/360 ICMA" | "EUROBOND" | "EUROBOND BASIS" | "THIRTY360E" => {
                Ok(DayCountConvention::Thirty360E)
            }

            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),

            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACTUAL/365 FIXED"
            | "ACT365FIXED" | "ACT365" => Ok(DayCountConvention::Act365Fixed),

            _ => Err(CoreError::unsupported("day count", s)),
        }
    }
}
