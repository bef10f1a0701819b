use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use configuration::settings::MarketDataConfig;
use core_types::PricePoint;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

pub mod error;
pub mod fred;
pub mod responses;
// --- Public API ---
pub use fred::FredClient;
pub use responses::{Observation, ObservationsResponse};

/// The generic, abstract interface for a daily price-data source.
/// This trait is the contract the analysis pipeline is driven through,
/// allowing the underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches the daily close series for an instrument, ordered by time
    /// ascending, one point per trading day. An empty series means the
    /// instrument/date range simply has no data; it is not an error.
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, ApiError>;
}

/// A concrete implementation of `MarketDataClient` for the Binance spot API.
#[derive(Clone)]
pub struct BinanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(config: &MarketDataConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }
}

// Intermediate struct for deserializing the positional kline arrays that the
// Binance API returns.
#[derive(Deserialize)]
struct RawKline(
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    i64,
    String,
    String,
    String,
);

/// Converts raw klines into the close-per-day series the pipeline consumes.
/// The open time marks the trading day; the close price is field five.
fn price_points(raw: Vec<RawKline>) -> Result<Vec<PricePoint>, ApiError> {
    raw.into_iter()
        .map(|kline| {
            Ok(PricePoint {
                timestamp: Utc
                    .timestamp_millis_opt(kline.0)
                    .single()
                    .ok_or_else(|| ApiError::InvalidData(format!("Invalid open_time: {}", kline.0)))?,
                close: Decimal::from_str(&kline.4)
                    .map_err(|e| ApiError::Deserialization(e.to_string()))?,
            })
        })
        .collect()
}

#[async_trait]
impl MarketDataClient for BinanceClient {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, ApiError> {
        let url = format!("{}/api/v3/klines", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", "1d"),
                ("startTime", &start_time.timestamp_millis().to_string()),
                ("endTime", &end_time.timestamp_millis().to_string()),
                ("limit", "1000"),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Api(format!(
                "klines request failed with status {}: {}",
                status, text
            )));
        }

        let raw = serde_json::from_str::<Vec<RawKline>>(&text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        price_points(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(open_time: i64, close: &str) -> RawKline {
        RawKline(
            open_time,
            "0".to_string(),
            "0".to_string(),
            "0".to_string(),
            close.to_string(),
            "0".to_string(),
            open_time + 86_399_999,
            "0".to_string(),
            0,
            "0".to_string(),
            "0".to_string(),
            "0".to_string(),
        )
    }

    #[test]
    fn klines_convert_to_ordered_price_points() {
        let day = 86_400_000;
        let points =
            price_points(vec![raw(0, "100.5"), raw(day, "101"), raw(2 * day, "99.25")]).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].close, Decimal::from_str("100.5").unwrap());
        assert_eq!(points[1].timestamp, Utc.timestamp_millis_opt(day).unwrap());
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn unparseable_close_is_a_deserialization_error() {
        let result = price_points(vec![raw(0, "not-a-price")]);
        assert!(matches!(result, Err(ApiError::Deserialization(_))));
    }

    #[test]
    fn empty_payload_gives_empty_series() {
        assert!(price_points(Vec::new()).unwrap().is_empty());
    }
}
