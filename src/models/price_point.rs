use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Single daily closing price observation.
///
/// Series returned by the service are strictly ascending by timestamp and
/// contain only positive closes; zero-valued closes are upstream "no trade"
/// sentinels and are filtered out during extraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading-day timestamp
    pub timestamp: DateTime<Utc>,

    /// Closing price
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self { timestamp, close }
    }
}
