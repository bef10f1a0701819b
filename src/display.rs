use analytics::RollingStatsRow;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use core_types::TRADING_DAYS_PER_YEAR;
use rust_decimal::Decimal;

/// Prints the results table for the most recent rows, followed by the
/// summary block.
pub fn print_report(symbol: &str, rows: &[RollingStatsRow], limit: usize) {
    println!(
        "\n{} Rolling Sharpe Components (Latest {} Days):",
        symbol,
        limit.min(rows.len())
    );
    println!("{}", render_table(rows, limit));
    print_summary(rows);
}

/// Renders the most recent `limit` rows with six-decimal statistics.
fn render_table(rows: &[RollingStatsRow], limit: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Date",
            "Close",
            "Daily Return",
            "Daily Risk Free",
            "Rolling Mean",
            "Rolling Std",
            "Rolling Sharpe",
        ]);

    let tail_start = rows.len().saturating_sub(limit);
    for row in &rows[tail_start..] {
        table.add_row(vec![
            Cell::new(row.timestamp.format("%Y-%m-%d")),
            Cell::new(format!("{:.2}", row.close)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.6}", row.daily_return)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.6}", row.daily_risk_free)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.6}", row.rolling_mean)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.6}", row.rolling_std)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", row.rolling_sharpe)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

fn print_summary(rows: &[RollingStatsRow]) {
    let Some(last) = rows.last() else {
        return;
    };
    // Approximate re-annualization of the daily rate, for display only.
    let annual_rf_pct =
        last.daily_risk_free * Decimal::from(TRADING_DAYS_PER_YEAR) * Decimal::from(100u32);

    println!("\nSummary Statistics:");
    println!("- Annual Risk-Free Rate: {:.2}%", annual_rf_pct);
    println!("- Latest Sharpe Ratio: {:.4}", last.rolling_sharpe);
    println!(
        "- Volatility (Std Dev): {:.2}%",
        last.rolling_std * Decimal::from(100u32)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn row(day: u32, sharpe: Decimal) -> RollingStatsRow {
        RollingStatsRow {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            close: dec!(100.5),
            daily_return: dec!(0.01),
            daily_risk_free: dec!(0.0000785),
            rolling_mean: dec!(0.005),
            rolling_std: dec!(0.012),
            rolling_sharpe: sharpe,
        }
    }

    #[test]
    fn table_is_limited_to_the_most_recent_rows() {
        let rows: Vec<RollingStatsRow> = (1..=5).map(|d| row(d, Decimal::from(d))).collect();
        let rendered = render_table(&rows, 2).to_string();

        assert!(rendered.contains("2024-01-04"));
        assert!(rendered.contains("2024-01-05"));
        assert!(!rendered.contains("2024-01-03"));
    }

    #[test]
    fn table_formats_the_statistics() {
        let rows = vec![row(1, dec!(1.2345))];
        let rendered = render_table(&rows, 10).to_string();

        assert!(rendered.contains("100.50"));
        assert!(rendered.contains("0.010000"));
        assert!(rendered.contains("1.2345"));
    }
}
