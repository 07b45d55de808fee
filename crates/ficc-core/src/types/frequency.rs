//! Coupon frequency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Coupon payment frequency of a periodic bond.
///
/// Also fixes the compounding of the bond's yield: a semi-annual bond quotes a
/// semi-annually compounded yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Annual payments (1 per year)
    Annual,
    /// Semi-annual payments (2 per year) - most common for US bonds
    #[default]
    SemiAnnual,
    /// Quarterly payments (4 per year)
    Quarterly,
    /// Monthly payments (12 per year)
    Monthly,
}

impl Frequency {
    /// Builds a frequency from a number of periods per year.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidFrequency` for zero or for counts that do not
    /// divide a year into whole months.
    pub fn from_periods_per_year(periods: u32) -> CoreResult<Self> {
        match periods {
            1 => Ok(Frequency::Annual),
            2 => Ok(Frequency::SemiAnnual),
            4 => Ok(Frequency::Quarterly),
            12 => Ok(Frequency::Monthly),
            0 => Err(CoreError::invalid_frequency(
                "a coupon schedule needs at least one period per year",
            )),
            n => Err(CoreError::invalid_frequency(format!(
                "{n} periods per year is not supported"
            ))),
        }
    }

    /// Returns the number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Returns the number of months per period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }

    /// Periods per year as `f64`, the `f` in `(1 + y/f)`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        f64::from(self.periods_per_year())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    /// Accepts names (`"semiannual"`, `"Semi-Annual"`, `"quarterly"`) or a count
    /// of periods per year (`"2"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "ANNUAL" | "A" | "1Y" => Ok(Frequency::Annual),
            "SEMIANNUAL" | "S" | "SA" | "6M" => Ok(Frequency::SemiAnnual),
            "QUARTERLY" | "Q" | "3M" => Ok(Frequency::Quarterly),
            "MONTHLY" | "M" | "1M" => Ok(Frequency::Monthly),
            other => match other.parse::<u32>() {
                Ok(n) => Self::from_periods_per_year(n),
                Err(_) => Err(CoreError::unsupported("frequency", s)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_periods() {
        assert_eq!(Frequency::Annual.periods_per_year(), 1);
        assert_eq!(Frequency::SemiAnnual.periods_per_year(), 2);
        assert_eq!(Frequency::Quarterly.months_per_period(), 3);
        assert_eq!(Frequency::Monthly.months_per_period(), 1);
        assert_eq!(Frequency::default(), Frequency::SemiAnnual);
    }

    #[test]
    fn test_from_periods_per_year() {
        assert_eq!(Frequency::from_periods_per_year(2).unwrap(), Frequency::SemiAnnual);
        assert!(matches!(
            Frequency::from_periods_per_year(0),
            Err(CoreError::InvalidFrequency { .. })
        ));
        assert!(Frequency::from_periods_per_year(5).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Semi-Annual".parse::<Frequency>().unwrap(), Frequency::SemiAnnual);
        assert_eq!("quarterly".parse::<Frequency>().unwrap(), Frequency::Quarterly);
        assert_eq!("12".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!(matches!(
            "fortnightly".parse::<Frequency>(),
            Err(CoreError::UnsupportedConvention { .. })
        ));
        assert!(matches!(
            "0".parse::<Frequency>(),
            Err(CoreError::InvalidFrequency { .. })
        ));
    }
}
