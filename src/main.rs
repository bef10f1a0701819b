use analytics::RollingSharpeCalculator;
use api_client::error::ApiError;
use api_client::{BinanceClient, FredClient, MarketDataClient};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use configuration::Settings;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod display;
mod plot;

/// The main entry point for the sharpescope application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The .env file is optional: without a FRED_API_KEY the configured
    // fallback rate is used.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Rolling, annualized Sharpe ratio monitor for a single instrument.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prices and the risk-free rate, then compute and render the
    /// rolling Sharpe series.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Instrument symbol (e.g., "BTCUSDT"). Defaults to config.toml.
    #[arg(long)]
    symbol: Option<String>,

    /// Rolling window in trading days. Defaults to config.toml.
    #[arg(long)]
    window: Option<usize>,

    /// Write a three-panel SVG chart to this path.
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Print the full series as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of the analysis: fetch both inputs, resolve the
/// rate fallback, run the calculator, render the output.
async fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let settings = configuration::load_config()?;
    let symbol = args
        .symbol
        .unwrap_or_else(|| settings.analysis.symbol.clone());
    let window_days = args.window.unwrap_or(settings.analysis.window_days);

    // Request 3x the window in calendar days, a heuristic to gather at least
    // `window_days` trading observations across weekends and holidays. The
    // calculator re-checks sufficiency either way.
    let end_time = Utc::now();
    let start_time = end_time - Duration::days(window_days as i64 * 3);

    tracing::info!(%symbol, window_days, "starting rolling Sharpe analysis");

    let market_client = BinanceClient::new(&settings.market_data);
    let api_key = std::env::var("FRED_API_KEY").ok();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(format!(
        "Fetching {} prices and the risk-free rate...",
        symbol
    ));

    // Both inputs are independent, so fetch them concurrently.
    let (prices, rate_outcome) = futures::join!(
        market_client.fetch_daily_closes(&symbol, start_time, end_time),
        fetch_rate(&settings, api_key)
    );
    spinner.finish_and_clear();

    let prices = prices?;
    let annual_rf = resolve_risk_free_rate(rate_outcome, settings.analysis.fallback_annual_rf);

    let calculator = RollingSharpeCalculator::new();
    let rows = calculator.compute(&prices, window_days, annual_rf)?;

    if rows.is_empty() {
        println!(
            "No rolling statistics available for {} ({} prices fetched, window {}).",
            symbol,
            prices.len(),
            window_days
        );
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        display::print_report(&symbol, &rows, settings.display.table_rows);
    }

    if let Some(path) = args.plot {
        plot::write_chart(&path, &rows, &symbol, window_days)?;
        println!("Chart written to {}", path.display());
    }

    Ok(())
}

/// Fetches the T-bill yield when an API key is configured. `None` means the
/// rate source is not even reachable in principle (no key).
async fn fetch_rate(settings: &Settings, api_key: Option<String>) -> Option<Result<Decimal, ApiError>> {
    let api_key = api_key?;
    let client = FredClient::new(&settings.fred, api_key);
    Some(client.fetch_t_bill_yield().await)
}

/// Applies the fallback policy: the core calculator always receives an
/// already-resolved rate, and any substitution happens here, with a warning.
fn resolve_risk_free_rate(
    outcome: Option<Result<Decimal, ApiError>>,
    fallback: Decimal,
) -> Decimal {
    match outcome {
        Some(Ok(rate)) => {
            tracing::info!(%rate, "using risk-free rate from FRED");
            rate
        }
        Some(Err(error)) => {
            tracing::warn!(%error, %fallback, "FRED unavailable, using fallback risk-free rate");
            fallback
        }
        None => {
            tracing::warn!(%fallback, "no FRED_API_KEY configured, using fallback risk-free rate");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone};
    use core_types::PricePoint;
    use rust_decimal_macros::dec;

    /// A canned price source standing in for the live exchange client.
    struct CannedMarketData {
        points: Vec<PricePoint>,
    }

    #[async_trait]
    impl MarketDataClient for CannedMarketData {
        async fn fetch_daily_closes(
            &self,
            _symbol: &str,
            _start_time: DateTime<Utc>,
            _end_time: DateTime<Utc>,
        ) -> Result<Vec<PricePoint>, ApiError> {
            Ok(self.points.clone())
        }
    }

    fn canned_series() -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        [100, 101, 102, 101, 100, 99, 100, 101, 102, 103]
            .into_iter()
            .enumerate()
            .map(|(i, close)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                close: Decimal::from(close),
            })
            .collect()
    }

    #[tokio::test]
    async fn pipeline_runs_end_to_end_with_a_canned_source() {
        let client: Box<dyn MarketDataClient> = Box::new(CannedMarketData {
            points: canned_series(),
        });
        let start_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let prices = client
            .fetch_daily_closes("TESTUSDT", start_time, start_time + Duration::days(63))
            .await
            .unwrap();

        // No rate source configured: the fallback policy kicks in before the
        // calculator ever runs.
        let annual_rf = resolve_risk_free_rate(None, dec!(0.02));
        let rows = RollingSharpeCalculator::new()
            .compute(&prices, 3, annual_rf)
            .unwrap();

        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|row| row.rolling_std > Decimal::ZERO));
        assert!(rows[0].daily_risk_free > Decimal::ZERO);
    }

    #[test]
    fn fetched_rate_is_used_as_is() {
        let resolved = resolve_risk_free_rate(Some(Ok(dec!(0.0525))), dec!(0.02));
        assert_eq!(resolved, dec!(0.0525));
    }

    #[test]
    fn fetch_error_falls_back_to_the_configured_rate() {
        let outcome = Some(Err(ApiError::Api("status 500".to_string())));
        assert_eq!(resolve_risk_free_rate(outcome, dec!(0.02)), dec!(0.02));
    }

    #[test]
    fn missing_api_key_falls_back_to_the_configured_rate() {
        assert_eq!(resolve_risk_free_rate(None, dec!(0.02)), dec!(0.02));
    }
}
