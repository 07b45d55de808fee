//! # ficc Core
//!
//! Dates, market calendars and day count conventions for the ficc fixed income
//! analytics core.
//!
//! This crate provides the leaf building blocks the bond engine is parameterized by:
//!
//! - **Types**: [`Date`], [`Frequency`], [`Currency`]
//! - **Day Count Conventions**: year fractions and coupon period fractions
//! - **Business Day Calendars**: holiday calendars and business day adjustment
//!
//! Everything here is immutable after construction and safe to share across threads.
//!
//! ## Example
//!
//! ```rust
//! use ficc_core::prelude::*;
//!
//! let start = Date::from_ymd(2025, 2, 15).unwrap();
//! let end = Date::from_ymd(2025, 8, 15).unwrap();
//! let settle = Date::from_ymd(2025, 6, 30).unwrap();
//!
//! let dc = DayCountConvention::ActActBond.to_day_count();
//! let fraction = dc.accrued_fraction(start, end, settle);
//! assert!((fraction - 135.0 / 181.0).abs() < 1e-15);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::cast_possible_truncation)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayConvention, Calendar, CalendarId, CalendarRegistry, NullCalendar,
        WeekendCalendar,
    };
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Currency, Date, Frequency};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Currency, Date, Frequency};
