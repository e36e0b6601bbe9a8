//! OHLC candle model

use chrono::{DateTime, Utc};

/// Open/high/low/close summary of price movement over a two-sample window
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// Timestamp of the closing sample
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Whether the close finished at or above the open
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}
