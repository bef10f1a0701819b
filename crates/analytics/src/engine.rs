use crate::error::AnalyticsError;
use crate::report::RollingStatsRow;
use core_types::{PricePoint, TRADING_DAYS_PER_YEAR};
use rust_decimal::{Decimal, MathematicalOps};

/// A stateless calculator for deriving a rolling, annualized Sharpe ratio
/// series from a daily price series.
#[derive(Debug, Default)]
pub struct RollingSharpeCalculator {}

impl RollingSharpeCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for the rolling statistics pipeline.
    ///
    /// # Arguments
    ///
    /// * `prices` - The daily close series, ordered by strictly increasing
    ///   timestamp, one point per trading day.
    /// * `window_days` - The size of the trailing return window (in trading
    ///   observations, not calendar days).
    /// * `annual_rf` - The already-resolved annualized risk-free rate. Rate
    ///   acquisition and any fallback policy belong to the caller.
    ///
    /// # Returns
    ///
    /// One `RollingStatsRow` per position where the trailing window of
    /// `window_days` returns is complete and the sample standard deviation is
    /// computable and non-zero. For `n` well-formed prices that is `n -
    /// window_days` rows. Fewer than `window_days + 1` prices is a legitimate
    /// empty result, not an error.
    ///
    /// # Errors
    ///
    /// `AnalyticsError::InvalidInput` for caller bugs: a zero window, a
    /// negative rate, or timestamps that are not strictly increasing.
    pub fn compute(
        &self,
        prices: &[PricePoint],
        window_days: usize,
        annual_rf: Decimal,
    ) -> Result<Vec<RollingStatsRow>, AnalyticsError> {
        if window_days == 0 {
            return Err(AnalyticsError::InvalidInput(
                "window_days".to_string(),
                "must be a positive number of trading days".to_string(),
            ));
        }
        if annual_rf < Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput(
                "annual_rf".to_string(),
                format!("risk-free rate must be non-negative, got {}", annual_rf),
            ));
        }
        if let Some(pair) = prices
            .windows(2)
            .find(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(AnalyticsError::InvalidInput(
                "prices".to_string(),
                format!(
                    "timestamps must be strictly increasing, violated at {}",
                    pair[1].timestamp
                ),
            ));
        }

        // A full window needs `window_days` returns, which needs one extra
        // price; and a sample standard deviation needs at least two returns.
        if prices.len() < window_days + 1 || window_days < 2 {
            tracing::debug!(
                prices = prices.len(),
                window_days,
                "not enough observations for a single rolling window"
            );
            return Ok(Vec::new());
        }

        let daily_rf = daily_risk_free_rate(annual_rf);
        let annualization = Decimal::from(TRADING_DAYS_PER_YEAR)
            .sqrt()
            .ok_or_else(|| {
                AnalyticsError::Internal(
                    "failed to calculate square root of the annualization factor".to_string(),
                )
            })?;

        // 1. Derive daily returns. A non-positive close cannot produce a
        // meaningful return, so it poisons its position (and, below, every
        // window that overlaps it) instead of being interpolated over.
        let returns: Vec<Option<Decimal>> = prices
            .windows(2)
            .map(|pair| {
                if pair[0].close > Decimal::ZERO && pair[1].close > Decimal::ZERO {
                    Some(pair[1].close / pair[0].close - Decimal::ONE)
                } else {
                    None
                }
            })
            .collect();

        // 2. Slide the trailing window across the return series. Return index
        // `i` belongs to price index `i + 1`.
        let mut rows = Vec::with_capacity(returns.len() - window_days + 1);
        for end in (window_days - 1)..returns.len() {
            let window: Option<Vec<Decimal>> = returns[end + 1 - window_days..=end]
                .iter()
                .copied()
                .collect();
            // Any poisoned return inside the window excludes this position.
            let Some(window) = window else {
                continue;
            };

            let mean = window.iter().sum::<Decimal>() / Decimal::from(window_days as u64);
            let variance = window
                .iter()
                .map(|r| (*r - mean) * (*r - mean))
                .sum::<Decimal>()
                / Decimal::from((window_days - 1) as u64);
            // Zero volatility makes the ratio undefined; such positions are
            // dropped, the same as incomplete windows.
            let std_dev = match variance.sqrt() {
                Some(std_dev) if !std_dev.is_zero() => std_dev,
                _ => continue,
            };

            rows.push(RollingStatsRow {
                timestamp: prices[end + 1].timestamp,
                close: prices[end + 1].close,
                daily_return: window[window_days - 1],
                daily_risk_free: daily_rf,
                rolling_mean: mean,
                rolling_std: std_dev,
                rolling_sharpe: (mean - daily_rf) / std_dev * annualization,
            });
        }

        Ok(rows)
    }
}

/// Converts an annualized rate to its daily-compounding equivalent:
/// `(1 + annual_rf)^(1/252) - 1`.
fn daily_risk_free_rate(annual_rf: Decimal) -> Decimal {
    // Short-circuit so a zero rate stays exactly zero instead of picking up
    // rounding from the fractional power.
    if annual_rf.is_zero() {
        return Decimal::ZERO;
    }
    let exponent = Decimal::ONE / Decimal::from(TRADING_DAYS_PER_YEAR);
    (Decimal::ONE + annual_rf).powd(exponent) - Decimal::ONE
}
