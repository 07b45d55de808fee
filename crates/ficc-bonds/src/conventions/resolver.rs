//! Resolves a bond's conventions from its classification.

use ficc_core::types::Frequency;

use super::table::{normalize_classification, ConventionTable};
use super::Conventions;
use crate::terms::BondTerms;

/// Outcome of a convention lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Conventions to analyze the bond under.
    pub conventions: Conventions,
    /// True when the classification was missing or unknown and the fallback was used.
    pub used_fallback: bool,
    /// True when a contractual frequency replaced the table's frequency.
    pub frequency_overridden: bool,
}

/// Maps issuer classifications to [`Conventions`].
///
/// Holds its table and fallback; there is no global resolver. Lookups never fail:
/// an unknown classification resolves to the fallback and says so in
/// [`Resolution::used_fallback`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConventionResolver {
    table: ConventionTable,
    fallback: Conventions,
}

impl Default for ConventionResolver {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConventionResolver {
    /// Creates a resolver over the given table with the standard fallback.
    #[must_use]
    pub fn new(table: ConventionTable) -> Self {
        Self {
            table,
            fallback: Conventions::fallback(),
        }
    }

    /// Resolver over [`ConventionTable::standard`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(ConventionTable::standard())
    }

    /// Replaces the fallback conventions.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Conventions) -> Self {
        self.fallback = fallback;
        self
    }

    /// The policy table.
    #[must_use]
    pub fn table(&self) -> &ConventionTable {
        &self.table
    }

    /// The fallback conventions.
    #[must_use]
    pub fn fallback(&self) -> Conventions {
        self.fallback
    }

    /// Resolves the conventions for a bond.
    ///
    /// A contractual frequency in the terms wins over the table.
    #[must_use]
    pub fn resolve(&self, terms: &BondTerms) -> Resolution {
        self.resolve_classification(terms.classification.as_deref(), terms.frequency)
    }

    /// Resolves a classification tag with an optional contractual frequency.
    #[must_use]
    pub fn resolve_classification(
        &self,
        classification: Option<&str>,
        contractual_frequency: Option<Frequency>,
    ) -> Resolution {
        let found = classification.and_then(|tag| self.table.get(tag).copied());

        let (mut conventions, used_fallback) = match found {
            Some(conventions) => (conventions, false),
            None => {
                log::warn!(
                    "no conventions for classification {:?}; falling back to {}",
                    classification.map(normalize_classification),
                    self.fallback
                );
                (self.fallback, true)
            }
        };

        let frequency_overridden = match contractual_frequency {
            Some(frequency) if frequency != conventions.frequency => {
                conventions.frequency = frequency;
                true
            }
            _ => false,
        };

        log::debug!(
            "resolved {:?} to {conventions} (fallback: {used_fallback})",
            classification
        );

        Resolution {
            conventions,
            used_fallback,
            frequency_overridden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ficc_core::calendars::{BusinessDayConvention, CalendarId};
    use ficc_core::daycounts::DayCountConvention;
    use ficc_core::types::Date;
    use rust_decimal_macros::dec;

    fn terms(classification: Option<&str>) -> BondTerms {
        let terms = BondTerms::new(dec!(0.05), Date::from_ymd(2030, 6, 15).unwrap());
        match classification {
            Some(tag) => terms.with_classification(tag),
            None => terms,
        }
    }

    #[test]
    fn test_known_classification() {
        let resolver = ConventionResolver::standard();
        let resolution = resolver.resolve(&terms(Some("us_treasury")));
        assert!(!resolution.used_fallback);
        assert!(!resolution.frequency_overridden);
        assert_eq!(resolution.conventions.day_count, DayCountConvention::ActActBond);
        assert_eq!(resolution.conventions.calendar, CalendarId::UsGovernment);
    }

    #[test]
    fn test_unknown_and_missing_fall_back() {
        let resolver = ConventionResolver::standard();
        for tag in [Some("emerging_frontier"), None] {
            let resolution = resolver.resolve(&terms(tag));
            assert!(resolution.used_fallback);
            assert_eq!(resolution.conventions, Conventions::fallback());
            assert_eq!(
                resolution.conventions.business_day_convention,
                BusinessDayConvention::Unadjusted
            );
        }
    }

    #[test]
    fn test_contractual_frequency_overrides_table() {
        let resolver = ConventionResolver::standard();
        let quarterly = terms(Some("us_corporate")).with_frequency(Frequency::Quarterly);
        let resolution = resolver.resolve(&quarterly);
        assert!(resolution.frequency_overridden);
        assert_eq!(resolution.conventions.frequency, Frequency::Quarterly);
        assert_eq!(resolution.conventions.day_count, DayCountConvention::Thirty360US);

        let same = terms(Some("us_corporate")).with_frequency(Frequency::SemiAnnual);
        assert!(!resolver.resolve(&same).frequency_overridden);
    }

    #[test]
    fn test_custom_fallback() {
        let fallback = Conventions::fallback().with_frequency(Frequency::Annual);
        let resolver = ConventionResolver::new(ConventionTable::empty()).with_fallback(fallback);
        let resolution = resolver.resolve(&terms(Some("us_treasury")));
        assert!(resolution.used_fallback);
        assert_eq!(resolution.conventions.frequency, Frequency::Annual);
    }
}
