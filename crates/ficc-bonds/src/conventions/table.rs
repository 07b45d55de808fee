//! Classification to conventions policy table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use ficc_core::calendars::{BusinessDayConvention, CalendarId};
use ficc_core::daycounts::DayCountConvention;
use ficc_core::types::Frequency;

use super::Conventions;
use crate::error::EngineResult;

/// Normalizes a classification tag: trimmed, lowercase, spaces and hyphens
/// become underscores.
///
/// ```rust
/// use ficc_bonds::conventions::normalize_classification;
///
/// assert_eq!(normalize_classification(" US-Treasury "), "us_treasury");
/// ```
#[must_use]
pub fn normalize_classification(classification: &str) -> String {
    classification
        .trim()
        .to_lowercase()
        .replace(['-', ' '], "_")
}

/// Immutable map from normalized classification to [`Conventions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConventionTable {
    entries: HashMap<String, Conventions>,
}

impl ConventionTable {
    /// A table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in market table.
    #[must_use]
    pub fn standard() -> Self {
        use BusinessDayConvention::{Following, ModifiedFollowing};
        use CalendarId::{Target2, UnitedKingdom, UsGovernment, WeekendOnly};
        use DayCountConvention::{
            Act360, Act365Fixed, ActActBond, ActActIsda, Thirty360E, Thirty360US,
        };
        use Frequency::{Annual, Quarterly, SemiAnnual};

        Self::empty()
            .with("us_treasury", Conventions::new(ActActBond, Following, UsGovernment, SemiAnnual))
            .with("us_agency", Conventions::new(Thirty360US, Following, UsGovernment, SemiAnnual))
            .with("us_corporate", Conventions::new(Thirty360US, Following, UsGovernment, SemiAnnual))
            .with("us_municipal", Conventions::new(Thirty360US, Following, UsGovernment, SemiAnnual))
            .with("uk_gilt", Conventions::new(ActActBond, Following, UnitedKingdom, SemiAnnual))
            .with("german_bund", Conventions::new(ActActBond, Following, Target2, Annual))
            .with("eurobond", Conventions::new(Thirty360E, Following, Target2, Annual))
            .with("eur_swap_fixed", Conventions::new(ActActIsda, ModifiedFollowing, Target2, Annual))
            .with("money_market", Conventions::new(Act360, ModifiedFollowing, UsGovernment, Quarterly))
            .with("canada_government", Conventions::new(Act365Fixed, Following, WeekendOnly, SemiAnnual))
            .with("japan_government", Conventions::new(Act365Fixed, Following, WeekendOnly, SemiAnnual))
    }

    /// Adds or replaces an entry.
    #[must_use]
    pub fn with(mut self, classification: &str, conventions: Conventions) -> Self {
        self.entries
            .insert(normalize_classification(classification), conventions);
        self
    }

    /// Builds a table from configuration entries.
    ///
    /// This is where convention identifiers are parsed; any unknown identifier fails
    /// with `AnalyticsError::UnsupportedConvention`.
    pub fn from_entries<'a, I>(entries: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a ConventionEntry)>,
    {
        let mut table = Self::empty();
        for (classification, entry) in entries {
            table = table.with(classification, entry.to_conventions()?);
        }
        Ok(table)
    }

    /// Entries of `other` override entries of `self`.
    #[must_use]
    pub fn merged_with(mut self, other: ConventionTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Looks up a classification (normalized first).
    #[must_use]
    pub fn get(&self, classification: &str) -> Option<&Conventions> {
        self.entries.get(&normalize_classification(classification))
    }

    /// Sorted classifications.
    #[must_use]
    pub fn classifications(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Iterates over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Conventions)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Frequency as written in a configuration document: a count or a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencySpec {
    /// Periods per year, e.g. `2`.
    PeriodsPerYear(u32),
    /// A name such as `"semiannual"` or `"quarterly"`.
    Name(String),
}

impl FrequencySpec {
    /// Parses into a [`Frequency`].
    pub fn to_frequency(&self) -> EngineResult<Frequency> {
        let frequency = match self {
            FrequencySpec::PeriodsPerYear(n) => Frequency::from_periods_per_year(*n)?,
            FrequencySpec::Name(name) => name.parse()?,
        };
        Ok(frequency)
    }
}

/// One `[conventions.<classification>]` entry of a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConventionEntry {
    /// Day count name, e.g. `"ACT/ACT BOND"` or `"30/360 US"`.
    pub day_count: String,
    /// Business day convention; unadjusted when absent.
    #[serde(default)]
    pub business_day_convention: Option<String>,
    /// Frequency; semi-annual when absent.
    #[serde(default)]
    pub frequency: Option<FrequencySpec>,
    /// Calendar code; `NULL` when absent.
    #[serde(default)]
    pub calendar: Option<String>,
    /// End-of-month rule; on when absent.
    #[serde(default)]
    pub end_of_month: Option<bool>,
}

impl ConventionEntry {
    /// Parses every identifier of the entry.
    pub fn to_conventions(&self) -> EngineResult<Conventions> {
        let day_count: DayCountConvention = self.day_count.parse()?;
        let business_day_convention = match &self.business_day_convention {
            Some(name) => name.parse()?,
            None => BusinessDayConvention::Unadjusted,
        };
        let frequency = match &self.frequency {
            Some(spec) => spec.to_frequency()?,
            None => Frequency::SemiAnnual,
        };
        let calendar = match &self.calendar {
            Some(code) => code.parse()?,
            None => CalendarId::Null,
        };
        Ok(
            Conventions::new(day_count, business_day_convention, calendar, frequency)
                .with_end_of_month(self.end_of_month.unwrap_or(true)),
        )
    }
}
