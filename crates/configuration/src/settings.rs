use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub analysis: AnalysisConfig,
    pub market_data: MarketDataConfig,
    pub fred: FredConfig,
    pub display: DisplayConfig,
}

/// Parameters of the rolling Sharpe analysis itself.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// The instrument to analyze (e.g., "BTCUSDT").
    pub symbol: String,
    /// The rolling window size in trading days. 21 approximates one month.
    pub window_days: usize,
    /// The annualized risk-free rate substituted when FRED is unavailable.
    pub fallback_annual_rf: Decimal,
}

/// Connection details for the market-data source.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataConfig {
    /// Base URL of the exchange REST API (e.g., "https://api.binance.com").
    pub base_url: String,
}

/// Connection details for the FRED observations API.
///
/// The API key itself is a secret and comes from the `FRED_API_KEY`
/// environment variable, not from this file.
#[derive(Debug, Clone, Deserialize)]
pub struct FredConfig {
    /// Base URL of the FRED API (e.g., "https://api.stlouisfed.org").
    pub base_url: String,
    /// The observation series to read the risk-free rate from.
    /// "TB3MS" is the 3-month US Treasury bill yield.
    pub series_id: String,
}

/// Console output preferences.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// How many of the most recent rows to render in the results table.
    pub table_rows: usize,
}

impl Settings {
    /// Checks the cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.window_days == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.window_days must be at least 1".to_string(),
            ));
        }
        if self.analysis.fallback_annual_rf < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "analysis.fallback_annual_rf must be non-negative, got {}",
                self.analysis.fallback_annual_rf
            )));
        }
        if self.analysis.symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.symbol must not be empty".to_string(),
            ));
        }
        if self.display.table_rows == 0 {
            return Err(ConfigError::ValidationError(
                "display.table_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
