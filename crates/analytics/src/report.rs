use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One fully-resolved row of the rolling Sharpe series.
///
/// This struct is the output of the `RollingSharpeCalculator` and serves as
/// the data transfer object for the derived series throughout the system.
/// Every field is defined: rows where the rolling window is incomplete or the
/// ratio is undefined never make it into the output, so consumers do not have
/// to re-check for missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingStatsRow {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
    /// Simple daily return: `close[i] / close[i-1] - 1`.
    pub daily_return: Decimal,
    /// The annualized risk-free rate converted to its daily-compounding
    /// equivalent. Constant across the series.
    pub daily_risk_free: Decimal,
    /// Arithmetic mean of the trailing window of daily returns.
    pub rolling_mean: Decimal,
    /// Sample standard deviation (Bessel-corrected) of the trailing window.
    pub rolling_std: Decimal,
    /// `(rolling_mean - daily_risk_free) / rolling_std * sqrt(252)`.
    pub rolling_sharpe: Decimal,
}
