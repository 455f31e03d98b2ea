use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unified instrument snapshot assembled from upstream data.
///
/// Invariants upheld by the service:
/// - `name` is never empty in a returned record; if every source yields an
///   empty name, the call fails instead.
/// - `currency` is always set: explicit provider metadata, else inferred
///   from the symbol suffix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Ticker symbol as requested by the caller
    pub symbol: String,

    /// Display name (localized for mainland-China listings when available)
    pub name: String,

    /// Latest traded price
    pub current_price: Decimal,

    /// Currency code (ISO 4217)
    pub currency: String,

    /// When the record was assembled from upstream data
    pub retrieved_at: DateTime<Utc>,
}

impl StockInfo {
    /// Create a new record with the retrieval time stamped now.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_price: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            current_price,
            currency: currency.into(),
            retrieved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_stock_info_new() {
        let info = StockInfo::new("AAPL", "Apple Inc.", dec!(189.84), "USD");
        assert_eq!(info.symbol, "AAPL");
        assert_eq!(info.name, "Apple Inc.");
        assert_eq!(info.current_price, dec!(189.84));
        assert_eq!(info.currency, "USD");
    }
}
