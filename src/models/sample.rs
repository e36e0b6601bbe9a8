//! Raw price series model

use chrono::{DateTime, Utc};

/// A single raw price observation from the market-data provider
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}
