//! Chart API response models.
//!
//! The chart endpoint nests identity metadata and parallel timestamp/close
//! arrays inside a two-level envelope. Every metadata field is optional at
//! every level; presence is checked field by field during extraction.

use serde::Deserialize;

/// Top-level envelope for the chart API.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

/// Chart container.
#[derive(Debug, Deserialize)]
pub struct Chart {
    /// `null` when the upstream reports an error for the symbol.
    pub result: Option<Vec<ChartResult>>,
    // Note: an error field exists in the API but we handle errors via
    // HTTP status and empty results
}

/// Single chart result: identity metadata plus the price series.
#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,

    /// Epoch-second trading-day timestamps, parallel to the close array.
    #[serde(default)]
    pub timestamp: Vec<i64>,

    #[serde(default)]
    pub indicators: ChartIndicators,
}

/// Identity metadata for the requested symbol.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub currency: Option<String>,
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

/// Indicator container holding the quote blocks.
#[derive(Debug, Default, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuoteBlock>,
}

/// Close prices, parallel to the envelope's timestamp array.
/// Entries are `null` when no trade happened in an interval.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuoteBlock {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_envelope() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {
                        "currency": "USD",
                        "symbol": "AAPL",
                        "regularMarketPrice": 189.84,
                        "longName": "Apple Inc.",
                        "shortName": "Apple"
                    },
                    "timestamp": [1700000000, 1700086400],
                    "indicators": {
                        "quote": [{"close": [188.61, 189.84]}]
                    }
                }],
                "error": null
            }
        }"#;
        let envelope: ChartResponse = serde_json::from_str(json).unwrap();
        let result = &envelope.chart.result.as_ref().unwrap()[0];
        assert_eq!(result.meta.symbol.as_deref(), Some("AAPL"));
        assert_eq!(result.meta.regular_market_price, Some(189.84));
        assert_eq!(result.timestamp.len(), 2);
        assert_eq!(result.indicators.quote[0].close, vec![Some(188.61), Some(189.84)]);
    }

    #[test]
    fn test_deserialize_null_result() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let envelope: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(envelope.chart.result.is_none());
    }

    #[test]
    fn test_deserialize_sparse_meta() {
        // Name and currency fields are optional at every level
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"regularMarketPrice": 10.5},
                    "timestamp": [],
                    "indicators": {"quote": [{"close": []}]}
                }]
            }
        }"#;
        let envelope: ChartResponse = serde_json::from_str(json).unwrap();
        let result = &envelope.chart.result.as_ref().unwrap()[0];
        assert!(result.meta.long_name.is_none());
        assert!(result.meta.currency.is_none());
        assert!(result.timestamp.is_empty());
    }

    #[test]
    fn test_deserialize_null_closes() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {},
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {"quote": [{"close": [10.0, null, 12.0]}]}
                }]
            }
        }"#;
        let envelope: ChartResponse = serde_json::from_str(json).unwrap();
        let result = &envelope.chart.result.as_ref().unwrap()[0];
        assert_eq!(
            result.indicators.quote[0].close,
            vec![Some(10.0), None, Some(12.0)]
        );
    }

    #[test]
    fn test_deserialize_missing_indicators() {
        let json = r#"{"chart": {"result": [{"meta": {}}]}}"#;
        let envelope: ChartResponse = serde_json::from_str(json).unwrap();
        let result = &envelope.chart.result.as_ref().unwrap()[0];
        assert!(result.indicators.quote.is_empty());
        assert!(result.timestamp.is_empty());
    }
}
