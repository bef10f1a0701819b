use analytics::RollingStatsRow;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;

// Panel geometry loosely follows the Matplotlib layout of the classic
// three-panel rolling Sharpe figure.
const WIDTH: f64 = 920.0;
const PANEL_HEIGHT: f64 = 240.0;
const PADDING: f64 = 52.0;

const SHARPE_COLOR: &str = "navy";
const MEAN_COLOR: &str = "green";
const RISK_FREE_COLOR: &str = "red";
const VOLATILITY_COLOR: &str = "purple";

struct Series {
    label: String,
    color: &'static str,
    dash: bool,
    values: Vec<f64>,
}

struct Panel {
    y_label: String,
    series: Vec<Series>,
}

/// Writes a three-panel SVG chart of the rolling series: Sharpe ratio, mean
/// daily return vs. the risk-free rate (both in %), and volatility in %.
pub fn write_chart(
    path: &Path,
    rows: &[RollingStatsRow],
    symbol: &str,
    window_days: usize,
) -> anyhow::Result<()> {
    if rows.is_empty() {
        anyhow::bail!("cannot plot an empty series");
    }
    std::fs::write(path, render_svg(rows, symbol, window_days))?;
    Ok(())
}

fn render_svg(rows: &[RollingStatsRow], symbol: &str, window_days: usize) -> String {
    let panels = [
        Panel {
            y_label: "Sharpe Ratio".to_string(),
            series: vec![Series {
                label: "Sharpe Ratio".to_string(),
                color: SHARPE_COLOR,
                dash: false,
                values: decimals(rows, |r| r.rolling_sharpe),
            }],
        },
        Panel {
            y_label: "Returns (%)".to_string(),
            series: vec![
                Series {
                    label: "Avg Daily Return (%)".to_string(),
                    color: MEAN_COLOR,
                    dash: false,
                    values: decimals(rows, |r| r.rolling_mean * rust_decimal::Decimal::from(100u32)),
                },
                Series {
                    label: "Risk-Free Rate (%)".to_string(),
                    color: RISK_FREE_COLOR,
                    dash: true,
                    values: decimals(rows, |r| {
                        r.daily_risk_free * rust_decimal::Decimal::from(100u32)
                    }),
                },
            ],
        },
        Panel {
            y_label: "Std Dev (%)".to_string(),
            series: vec![Series {
                label: "Volatility (%)".to_string(),
                color: VOLATILITY_COLOR,
                dash: false,
                values: decimals(rows, |r| r.rolling_std * rust_decimal::Decimal::from(100u32)),
            }],
        },
    ];

    let total_height = PANEL_HEIGHT * panels.len() as f64 + PADDING;
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{total_height}\" \
         viewBox=\"0 0 {WIDTH} {total_height}\" font-family=\"sans-serif\">\n"
    ));
    out.push_str(&format!(
        "<text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\">{} {}-Day Rolling Analysis</text>\n",
        WIDTH / 2.0,
        symbol,
        window_days
    ));

    for (index, panel) in panels.iter().enumerate() {
        render_panel(&mut out, panel, index);
    }

    // A shared x-axis: first and last dates of the series.
    let first = rows[0].timestamp.format("%Y-%m-%d");
    let last = rows[rows.len() - 1].timestamp.format("%Y-%m-%d");
    out.push_str(&format!(
        "<text x=\"{PADDING}\" y=\"{0}\" font-size=\"11\">{first}</text>\n",
        total_height - 8.0
    ));
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"11\">{last}</text>\n",
        WIDTH - PADDING,
        total_height - 8.0
    ));

    out.push_str("</svg>\n");
    out
}

fn render_panel(out: &mut String, panel: &Panel, index: usize) {
    let top = 32.0 + PANEL_HEIGHT * index as f64;
    let bottom = top + PANEL_HEIGHT - 36.0;
    let (min_v, max_v) = extent(&panel.series);

    // Frame and midline grid.
    out.push_str(&format!(
        "<rect x=\"{PADDING}\" y=\"{top}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#cccccc\"/>\n",
        WIDTH - 2.0 * PADDING,
        bottom - top
    ));
    let mid = (top + bottom) / 2.0;
    out.push_str(&format!(
        "<line x1=\"{PADDING}\" y1=\"{mid}\" x2=\"{}\" y2=\"{mid}\" stroke=\"#eeeeee\"/>\n",
        WIDTH - PADDING
    ));

    // Y-axis extent labels and the panel's y-label.
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\">{:.2}</text>\n",
        PADDING - 6.0,
        top + 10.0,
        max_v
    ));
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{bottom}\" text-anchor=\"end\" font-size=\"10\">{:.2}</text>\n",
        PADDING - 6.0,
        min_v
    ));
    out.push_str(&format!(
        "<text x=\"{PADDING}\" y=\"{}\" font-size=\"12\">{}</text>\n",
        top - 6.0,
        panel.y_label
    ));

    // Series polylines plus a small inline legend.
    for (series_index, series) in panel.series.iter().enumerate() {
        let dash = if series.dash {
            " stroke-dasharray=\"6 4\""
        } else {
            ""
        };
        out.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"{dash} points=\"{}\"/>\n",
            series.color,
            polyline_points(&series.values, top, bottom, min_v, max_v)
        ));
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"{}\">{}</text>\n",
            PADDING + 8.0,
            top + 14.0 + 13.0 * series_index as f64,
            series.color,
            series.label
        ));
    }
}

/// Maps a value series onto evenly spaced x positions inside the panel frame.
fn polyline_points(values: &[f64], top: f64, bottom: f64, min_v: f64, max_v: f64) -> String {
    let span = (max_v - min_v).max(f64::EPSILON);
    let step = if values.len() > 1 {
        (WIDTH - 2.0 * PADDING) / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = PADDING + step * i as f64;
            let y = bottom - (value - min_v) / span * (bottom - top);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extent across all series of a panel, padded so flat lines stay visible.
fn extent(series: &[Series]) -> (f64, f64) {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for series in series {
        for value in &series.values {
            min_v = min_v.min(*value);
            max_v = max_v.max(*value);
        }
    }
    if min_v == max_v {
        min_v -= 0.5;
        max_v += 0.5;
    }
    (min_v, max_v)
}

fn decimals<F>(rows: &[RollingStatsRow], pick: F) -> Vec<f64>
where
    F: Fn(&RollingStatsRow) -> rust_decimal::Decimal,
{
    rows.iter()
        .map(|row| pick(row).to_f64().unwrap_or_default())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn rows() -> Vec<RollingStatsRow> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        (0..5)
            .map(|i| RollingStatsRow {
                timestamp: start + Duration::days(i),
                close: dec!(100) + rust_decimal::Decimal::from(i),
                daily_return: dec!(0.01),
                daily_risk_free: dec!(0.0000785),
                rolling_mean: dec!(0.005),
                rolling_std: dec!(0.012),
                rolling_sharpe: rust_decimal::Decimal::from(i),
            })
            .collect()
    }

    #[test]
    fn svg_contains_all_three_panels() {
        let svg = render_svg(&rows(), "BTCUSDT", 21);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Sharpe Ratio"));
        assert!(svg.contains("Risk-Free Rate (%)"));
        assert!(svg.contains("Volatility (%)"));
        assert!(svg.contains("BTCUSDT 21-Day Rolling Analysis"));
        assert_eq!(svg.matches("<polyline").count(), 4);
    }

    #[test]
    fn flat_series_still_produces_a_visible_extent() {
        let series = [Series {
            label: "flat".to_string(),
            color: "navy",
            dash: false,
            values: vec![1.0, 1.0, 1.0],
        }];
        let (min_v, max_v) = extent(&series);
        assert!(max_v > min_v);
    }
}
