//! Domain types for fixed income analytics.
//!
//! - [`Date`]: Calendar date for financial calculations
//! - [`Frequency`]: Coupon frequency, which is also the yield compounding frequency
//! - [`Currency`]: ISO currency codes

mod currency;
mod date;
mod frequency;

pub use currency::Currency;
pub use date::Date;
pub use frequency::Frequency;

pub(crate) use date::{days_in_month, is_leap_year};
