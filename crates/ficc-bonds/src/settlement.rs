//! Settlement date resolution.

use ficc_core::calendars::Calendar;
use ficc_core::types::Date;

use crate::error::{AnalyticsError, EngineResult};

/// Trade date, settlement lag and the resolved settlement date.
///
/// # Example
///
/// ```rust
/// use ficc_bonds::SettlementContext;
/// use ficc_core::calendars::UsGovernmentCalendar;
/// use ficc_core::Date;
///
/// // Thursday 3 July 2025, T+1 skips Independence Day
/// let trade = Date::from_ymd(2025, 7, 3).unwrap();
/// let context = SettlementContext::new(trade, 1, UsGovernmentCalendar::global()).unwrap();
/// assert_eq!(context.settlement_date(), Date::from_ymd(2025, 7, 7).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementContext {
    trade_date: Date,
    lag: u32,
    settlement_date: Date,
}

/// Longest settlement lag accepted, in business days.
pub const MAX_SETTLEMENT_LAG: u32 = 30;

/// Calendar days of headroom a trade date needs past it for any accepted lag.
const SETTLEMENT_HORIZON_DAYS: i64 = 366;

impl SettlementContext {
    /// Settles `lag` business days after `trade_date` on `calendar`.
    ///
    /// A zero lag still rolls a non-business trade date forward. Fails with
    /// `InvalidInput` for lags over [`MAX_SETTLEMENT_LAG`] or trade dates too close
    /// to the end of the date range.
    pub fn new<C: Calendar + ?Sized>(
        trade_date: Date,
        lag: u32,
        calendar: &C,
    ) -> EngineResult<Self> {
        if lag > MAX_SETTLEMENT_LAG {
            return Err(AnalyticsError::invalid_input(format!(
                "settlement lag of {lag} business days exceeds {MAX_SETTLEMENT_LAG}"
            )));
        }
        if trade_date.checked_add_days(SETTLEMENT_HORIZON_DAYS).is_none() {
            return Err(AnalyticsError::invalid_input(format!(
                "trade date {trade_date} is too late to settle"
            )));
        }
        let days = i32::try_from(lag).unwrap_or(i32::MAX);
        Ok(Self {
            trade_date,
            lag,
            settlement_date: calendar.advance(trade_date, days),
        })
    }

    /// Settles on exactly `settlement_date`, with no lag and no adjustment.
    #[must_use]
    pub fn on(settlement_date: Date) -> Self {
        Self {
            trade_date: settlement_date,
            lag: 0,
            settlement_date,
        }
    }

    /// Parses an ISO-8601 settlement date and settles on it.
    pub fn parse(settlement_date: &str) -> EngineResult<Self> {
        Ok(Self::on(Date::parse(settlement_date)?))
    }

    /// The trade date.
    #[must_use]
    pub fn trade_date(&self) -> Date {
        self.trade_date
    }

    /// Settlement lag in business days.
    #[must_use]
    pub fn lag(&self) -> u32 {
        self.lag
    }

    /// The settlement date.
    #[must_use]
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// Checks the settlement date lies in `[issue, maturity)`, or before maturity
    /// when the issue date is unknown.
    pub fn ensure_within(&self, issue: Option<Date>, maturity: Date) -> EngineResult<()> {
        let settlement = self.settlement_date;
        let before_issue = issue.is_some_and(|issue| settlement < issue);
        if before_issue || settlement >= maturity {
            return Err(AnalyticsError::SettlementOutOfRange {
                settlement,
                issue,
                maturity,
            });
        }
        Ok(())
    }
}
