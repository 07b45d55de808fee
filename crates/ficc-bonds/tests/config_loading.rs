//! Loading engine configuration documents from disk and applying them.

use approx::assert_relative_eq;
use ficc_bonds::prelude::*;
use rust_decimal_macros::dec;

const FIXTURE: &str = include_str!("fixtures/conventions.toml");

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

#[test]
fn fixture_parses_and_validates() {
    let config = EngineConfig::from_toml_str(FIXTURE).unwrap();
    assert_eq!(config.solver.method, SolverMethod::Brent);
    assert_eq!(config.solver.max_iterations, 150);
    assert_relative_eq!(config.solver.price_tolerance, 1e-11);
    assert_eq!(config.schedule.direction, ScheduleDirection::Backward);
    assert_eq!(config.conventions.len(), 3);

    let table = config.convention_table().unwrap();
    assert_eq!(table.len(), ConventionTable::standard().len() + 2);

    let fixed_leg = table.get("Floating Rate Note Fixed Leg").unwrap();
    assert_eq!(fixed_leg.day_count, DayCountConvention::Act360);
    assert_eq!(fixed_leg.business_day_convention, BusinessDayConvention::ModifiedFollowing);
    assert_eq!(fixed_leg.frequency, Frequency::Quarterly);
    assert_eq!(fixed_leg.calendar, CalendarId::UsGovernment);
    assert!(!fixed_leg.end_of_month);

    let jgb = table.get("japan_government").unwrap();
    assert_eq!(jgb.calendar, CalendarId::Null);
}

#[test]
fn configured_classification_resolves_without_fallback() {
    let engine = AnalyticsEngine::from_toml_str(FIXTURE).unwrap();
    let terms = BondTerms::new(dec!(0.04), date(2031, 6, 2))
        .with_issue_date(date(2021, 6, 2))
        .with_classification("cad_provincial")
        .with_currency(Currency::CAD);

    let resolution = engine.resolve_conventions(&terms);
    assert!(!resolution.used_fallback);
    assert_eq!(resolution.conventions.day_count, DayCountConvention::Act365Fixed);
    assert_eq!(resolution.conventions.calendar, CalendarId::WeekendOnly);

    let result = engine
        .compute_analytics(&terms, &SettlementContext::on(date(2025, 6, 30)), 98.25)
        .unwrap();
    assert!(!result.used_fallback);
    assert!(result.yield_to_maturity > 4.0);
    assert!(result.modified_duration > 0.0);

    // 28 days of a 2% semi-annual coupon on ACT/365F.
    assert_relative_eq!(result.accrued_interest, 2.0 * 28.0 / 365.0 * 2.0, epsilon = 1e-12);
}

#[test]
fn json_and_toml_documents_agree() {
    let json = r#"{
        "solver": { "method": "brent", "price_tolerance": 1e-11, "max_iterations": 150 },
        "schedule": { "direction": "backward" },
        "conventions": {
            "cad_provincial": {
                "day_count": "ACT/365F",
                "business_day_convention": "following",
                "frequency": 2,
                "calendar": "WEEKEND"
            },
            "floating_rate_note_fixed_leg": {
                "day_count": "ACT/360",
                "business_day_convention": "modified following",
                "frequency": "quarterly",
                "calendar": "US_GOVT",
                "end_of_month": false
            },
            "japan_government": {
                "day_count": "ACT/365F",
                "business_day_convention": "following",
                "frequency": "semiannual",
                "calendar": "NULL"
            }
        }
    }"#;
    let from_json = EngineConfig::from_json_str(json).unwrap();
    let from_toml = EngineConfig::from_toml_str(FIXTURE).unwrap();
    assert_eq!(from_json, from_toml);
}

#[test]
fn unknown_identifiers_are_unsupported() {
    let document = "[conventions.exotic]\nday_count = \"ACT/366\"\n";
    assert!(matches!(
        EngineConfig::from_toml_str(document),
        Err(AnalyticsError::UnsupportedConvention { kind: "day count", .. })
    ));

    let document = "[conventions.exotic]\nday_count = \"ACT/360\"\ncalendar = \"TOKYO\"\n";
    assert!(matches!(
        AnalyticsEngine::from_toml_str(document),
        Err(AnalyticsError::UnsupportedConvention { kind: "calendar", .. })
    ));
}

#[test]
fn malformed_documents_are_config_errors() {
    for document in [
        "[solver]\nmax_iterations = 0\n",
        "[solver]\nyield_tolerance = 0.001\n",
        "[solver]\nmin_periodic_yield = 0.5\nmax_periodic_yield = 0.1\n",
        "[solver]\nmethod = \"secant\"\n",
        "[schedule]\nroll = \"imm\"\n",
        "[conventions.exotic]\nday_count = \"ACT/360\"\nfrequency = 0\n",
        "not toml at all = = =",
    ] {
        let err = EngineConfig::from_toml_str(document).unwrap_err();
        assert!(
            matches!(err, AnalyticsError::Config { .. }),
            "{document:?} gave {err:?}"
        );
    }
}
