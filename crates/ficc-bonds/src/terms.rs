//! Contractual terms of a fixed-coupon bullet bond.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ficc_core::{Currency, Date, Frequency};

use crate::error::{AnalyticsError, EngineResult};

/// Contractual terms of a fixed-coupon, non-amortizing bond.
///
/// Coupon rate is an annual decimal (`0.03` for 3%). Face value only scales the
/// currency accrued amount; prices are always per 100 face.
///
/// # Example
///
/// ```rust
/// use ficc_bonds::BondTerms;
/// use ficc_core::Date;
/// use rust_decimal::Decimal;
///
/// let terms = BondTerms::new(Decimal::new(3, 2), Date::from_ymd(2052, 8, 15).unwrap())
///     .with_issue_date(Date::from_ymd(2020, 8, 15).unwrap())
///     .with_classification("us_treasury");
/// assert!(terms.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    /// Issuer classification tag used to look up conventions.
    #[serde(default)]
    pub classification: Option<String>,
    /// Annual coupon rate as a decimal.
    pub coupon_rate: Decimal,
    /// Face value in currency units.
    #[serde(default = "default_face_value")]
    pub face_value: Decimal,
    /// First accrual date.
    #[serde(default)]
    pub issue_date: Option<Date>,
    /// Maturity date.
    pub maturity_date: Date,
    /// Contractual frequency; overrides the convention table.
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Currency of the face value.
    #[serde(default)]
    pub currency: Currency,
}

fn default_face_value() -> Decimal {
    Decimal::ONE_HUNDRED
}

impl BondTerms {
    /// Terms with a face value of 100 USD and no classification, issue date or
    /// contractual frequency.
    #[must_use]
    pub fn new(coupon_rate: Decimal, maturity_date: Date) -> Self {
        Self {
            classification: None,
            coupon_rate,
            face_value: default_face_value(),
            issue_date: None,
            maturity_date,
            frequency: None,
            currency: Currency::default(),
        }
    }

    /// Sets the classification tag.
    #[must_use]
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn with_issue_date(mut self, issue_date: Date) -> Self {
        self.issue_date = Some(issue_date);
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn with_face_value(mut self, face_value: Decimal) -> Self {
        self.face_value = face_value;
        self
    }

    /// Sets a contractual coupon frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Checks the terms can describe a coupon schedule.
    pub fn validate(&self) -> EngineResult<()> {
        if self.coupon_rate.is_sign_negative() && !self.coupon_rate.is_zero() {
            return Err(AnalyticsError::invalid_input(format!(
                "coupon rate must not be negative, got {}",
                self.coupon_rate
            )));
        }
        if self.face_value <= Decimal::ZERO {
            return Err(AnalyticsError::invalid_input(format!(
                "face value must be positive, got {}",
                self.face_value
            )));
        }
        if let Some(issue) = self.issue_date {
            if issue >= self.maturity_date {
                return Err(AnalyticsError::invalid_geometry(format!(
                    "issue date {issue} is not before maturity {}",
                    self.maturity_date
                )));
            }
        }
        Ok(())
    }

    /// Coupon rate as `f64`.
    pub fn coupon_rate_f64(&self) -> EngineResult<f64> {
        to_f64(self.coupon_rate, "coupon rate")
    }

    /// Face value as `f64`.
    pub fn face_value_f64(&self) -> EngineResult<f64> {
        to_f64(self.face_value, "face value")
    }
}

fn to_f64(value: Decimal, what: &str) -> EngineResult<f64> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AnalyticsError::invalid_input(format!("{what} {value} is not representable")))
}
