use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The assumed number of trading days in a year, used for annualization.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// A single observation of an instrument's daily close price.
///
/// A price series is an ordered slice of these, one per trading day, with
/// strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
}
