//! Candle derivation and chart rendering

use chrono::{DateTime, FixedOffset, Utc};
use plotters::prelude::*;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Candle, ChartArtifact, PriceSample};

/// Errors from the rendering stage
#[derive(Debug, Error)]
pub enum ChartError {
    /// Fewer than two samples, so no candle can be formed
    #[error("Not enough price data to build candles ({0} samples, minimum 2 required)")]
    InsufficientData(usize),
    /// Drawing backend failure
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// Derive OHLC candles by pairing each sample with its immediate predecessor
///
/// `open` is the previous price, `close` the current one, `high`/`low` the
/// extremes of the two. The first sample has no predecessor and produces no
/// candle, so the output is always one shorter than the input.
pub fn build_candles(samples: &[PriceSample]) -> Vec<Candle> {
    samples
        .windows(2)
        .map(|pair| Candle {
            timestamp: pair[1].timestamp,
            open: pair[0].price,
            close: pair[1].price,
            high: pair[0].price.max(pair[1].price),
            low: pair[0].price.min(pair[1].price),
        })
        .collect()
}

/// Format a timestamp for axis labels in the display timezone
fn format_label(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Render the sample series into a fixed-size candlestick chart PNG
///
/// The x axis is categorical: candles are evenly spaced in input order
/// regardless of the gaps between their timestamps, and labeled with local
/// timestamps in the configured display timezone.
pub fn render_chart(
    config: &AppConfig,
    samples: &[PriceSample],
) -> Result<ChartArtifact, ChartError> {
    if samples.len() < 2 {
        return Err(ChartError::InsufficientData(samples.len()));
    }

    let candles = build_candles(samples);

    // Use a temporary file path for BitMapBackend
    let temp_file = format!(
        "/tmp/candlecast_chart_{}.png",
        Utc::now().timestamp_millis()
    );

    {
        let backend = BitMapBackend::new(&temp_file, (config.chart_width, config.chart_height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(format!("Failed to fill canvas: {}", e)))?;

        // Find price range over the candle extremes
        let min_price = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let max_price = candles
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);

        // Add some padding to the price range
        let price_range = (max_price - min_price).max(1e-8); // Avoid division by zero
        let padding = price_range * 0.1;
        let y_min = (min_price - padding).max(0.0);
        let y_max = max_price + padding;

        let labels: Vec<String> = candles
            .iter()
            .map(|c| format_label(c.timestamp, config.display_offset))
            .collect();

        let caption = format!(
            "{}/{} Candlestick Chart ({})",
            config.asset_symbol,
            config.vs_currency.to_uppercase(),
            config.tz_label
        );

        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 40.0).into_font())
            .margin(15)
            .x_label_area_size(100)
            .y_label_area_size(60)
            .build_cartesian_2d(-1i32..candles.len() as i32, y_min..y_max)
            .map_err(|e| ChartError::Render(format!("Failed to build chart: {}", e)))?;

        // Configure mesh
        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|idx| {
                usize::try_from(*idx)
                    .ok()
                    .and_then(|i| labels.get(i).cloned())
                    .unwrap_or_default()
            })
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc(format!("Time ({})", config.tz_label))
            .y_desc(format!("Price ({})", config.vs_currency.to_uppercase()))
            .draw()
            .map_err(|e| ChartError::Render(format!("Failed to draw mesh: {}", e)))?;

        // Draw each candle, colored by direction
        for (i, candle) in candles.iter().enumerate() {
            let style = if candle.is_bullish() {
                GREEN.filled()
            } else {
                RED.filled()
            };

            chart
                .draw_series(std::iter::once(CandleStick::new(
                    i as i32,
                    candle.open,
                    candle.high,
                    candle.low,
                    candle.close,
                    style,
                    style,
                    7,
                )))
                .map_err(|e| ChartError::Render(format!("Failed to draw candle: {}", e)))?;
        }

        root.present()
            .map_err(|e| ChartError::Render(format!("Failed to render chart: {}", e)))?;
    }

    // Read the temporary file into memory
    let bytes = std::fs::read(&temp_file)
        .map_err(|e| ChartError::Render(format!("Failed to read chart file: {}", e)))?;

    // Clean up temporary file
    let _ = std::fs::remove_file(&temp_file);

    Ok(ChartArtifact {
        filename: config.output_filename.clone(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(secs: i64, price: f64) -> PriceSample {
        PriceSample {
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            price,
        }
    }

    #[test]
    fn test_candle_count_is_one_less_than_sample_count() {
        for n in 2..=6 {
            let samples: Vec<PriceSample> =
                (0..n).map(|i| sample(i as i64 * 60, 10.0 + i as f64)).collect();

            assert_eq!(build_candles(&samples).len(), n - 1);
        }
    }

    #[test]
    fn test_candle_pairing_rule() {
        let samples = vec![sample(0, 10.0), sample(60, 12.0), sample(120, 11.0)];

        let candles = build_candles(&samples);

        assert_eq!(candles.len(), 2);

        assert_eq!(candles[0].timestamp, samples[1].timestamp);
        assert_eq!(candles[0].open, 10.0);
        assert_eq!(candles[0].high, 12.0);
        assert_eq!(candles[0].low, 10.0);
        assert_eq!(candles[0].close, 12.0);

        assert_eq!(candles[1].timestamp, samples[2].timestamp);
        assert_eq!(candles[1].open, 12.0);
        assert_eq!(candles[1].high, 12.0);
        assert_eq!(candles[1].low, 11.0);
        assert_eq!(candles[1].close, 11.0);
    }

    #[test]
    fn test_candle_bounds_hold() {
        let samples = vec![
            sample(0, 5.0),
            sample(60, 7.5),
            sample(120, 6.25),
            sample(180, 6.25),
            sample(240, 9.0),
        ];

        for candle in build_candles(&samples) {
            assert!(candle.low <= candle.open && candle.open <= candle.high);
            assert!(candle.low <= candle.close && candle.close <= candle.high);
            assert!(candle.low <= candle.high);
        }
    }

    #[test]
    fn test_candle_timestamps_strictly_increasing() {
        let samples: Vec<PriceSample> =
            (0..5).map(|i| sample(i * 3600, 10.0)).collect();

        let candles = build_candles(&samples);

        for pair in candles.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
        // Candle timestamps are the non-first sample timestamps
        for (candle, s) in candles.iter().zip(samples.iter().skip(1)) {
            assert_eq!(candle.timestamp, s.timestamp);
        }
    }

    #[test]
    fn test_too_few_samples_produce_no_candles() {
        assert!(build_candles(&[]).is_empty());
        assert!(build_candles(&[sample(0, 10.0)]).is_empty());
    }

    #[test]
    fn test_render_rejects_insufficient_data() {
        let config = AppConfig::with_token("test_token".to_string());

        assert!(matches!(
            render_chart(&config, &[]),
            Err(ChartError::InsufficientData(0))
        ));
        assert!(matches!(
            render_chart(&config, &[sample(0, 10.0)]),
            Err(ChartError::InsufficientData(1))
        ));
    }

    #[test]
    fn test_flat_candle_is_bullish() {
        let candles = build_candles(&[sample(0, 10.0), sample(60, 10.0)]);

        assert!(candles[0].is_bullish());
    }

    #[test]
    fn test_label_formatting_uses_display_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 16, 30, 0).unwrap();
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();

        // 16:30 UTC is 00:30 the next day in UTC+8
        assert_eq!(format_label(ts, offset), "2024-01-02 00:30");
    }
}
