use crate::error::ApiError;
use crate::responses::{Observation, ObservationsResponse};
use configuration::settings::FredConfig;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Client for the FRED observations API, used to read the current
/// annualized risk-free rate (3-month T-bill yield by default).
///
/// On any failure this client surfaces an `ApiError`; it never substitutes a
/// fallback rate itself. The fallback policy belongs to the caller.
#[derive(Clone)]
pub struct FredClient {
    client: reqwest::Client,
    base_url: String,
    series_id: String,
    api_key: String,
}

impl FredClient {
    pub fn new(config: &FredConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            series_id: config.series_id.clone(),
            api_key,
        }
    }

    /// Fetches the most recent annualized yield of the configured series,
    /// as a decimal (e.g., 0.0525 for a reported 5.25%).
    pub async fn fetch_t_bill_yield(&self) -> Result<Decimal, ApiError> {
        let url = format!("{}/fred/series/observations", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", self.series_id.as_str()),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Api(format!(
                "FRED returned status {}: {}",
                status, text
            )));
        }

        let parsed = serde_json::from_str::<ObservationsResponse>(&text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        latest_annualized_yield(&parsed.observations).ok_or_else(|| {
            ApiError::InvalidData("no usable observation in FRED response".to_string())
        })
    }
}

/// Picks the most recent observation that is not the "." missing-data marker
/// and converts it from a percentage to a decimal rate.
fn latest_annualized_yield(observations: &[Observation]) -> Option<Decimal> {
    observations
        .iter()
        .rev()
        .find(|obs| obs.value != ".")
        .and_then(|obs| Decimal::from_str(&obs.value).ok())
        .map(|pct| pct / Decimal::from(100u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, value: &str) -> Observation {
        Observation {
            date: date.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn takes_the_latest_observation() {
        let observations = vec![obs("2025-06-01", "5.10"), obs("2025-07-01", "5.25")];
        assert_eq!(
            latest_annualized_yield(&observations),
            Some(Decimal::from_str("0.0525").unwrap())
        );
    }

    #[test]
    fn skips_missing_data_markers() {
        let observations = vec![
            obs("2025-06-01", "4.80"),
            obs("2025-07-01", "."),
            obs("2025-08-01", "."),
        ];
        assert_eq!(
            latest_annualized_yield(&observations),
            Some(Decimal::from_str("0.048").unwrap())
        );
    }

    #[test]
    fn empty_series_yields_nothing() {
        assert_eq!(latest_annualized_yield(&[]), None);
        let only_markers = vec![obs("2025-08-01", ".")];
        assert_eq!(latest_annualized_yield(&only_markers), None);
    }
}
