//! Primary market data provider: the Yahoo Finance chart API.
//!
//! One HTTP round trip per fetch, parameterized by symbol, epoch-second
//! range, and a daily interval. The nested response envelope carries both
//! identity metadata (name, currency, latest price) and the parallel
//! timestamp/close arrays, so a single endpoint backs both the info and the
//! historical-series operations.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use num_traits::FromPrimitive;
use reqwest::header;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::constants::{
    HTTP_USER_AGENT, INFO_LOOKBACK_DAYS, PRIMARY_TIMEOUT_SECS, PROVIDER_YAHOO,
    YAHOO_CHART_BASE_URL,
};
use crate::errors::StockDataError;
use crate::models::{PricePoint, StockInfo};
use crate::provider::ChartProvider;
use crate::symbol::infer_currency;

use models::{ChartResponse, ChartResult};

/// Chart API client.
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl YahooChartClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_CHART_BASE_URL)
    }

    /// Create a client against a custom base URL (used by tests and proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(PRIMARY_TIMEOUT_SECS),
        }
    }

    /// Fetch and unwrap the chart envelope for a symbol and range.
    async fn fetch_chart(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ChartResult, StockDataError> {
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            encode(symbol),
            start.timestamp(),
            end.timestamp()
        );

        debug!("Fetching chart data for {} from Yahoo", symbol);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header(header::USER_AGENT, HTTP_USER_AGENT)
            .send()
            .await
            .map_err(|e| StockDataError::UpstreamUnavailable {
                provider: PROVIDER_YAHOO.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StockDataError::InstrumentNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            return Err(StockDataError::UpstreamUnavailable {
                provider: PROVIDER_YAHOO.to_string(),
                message: format!("status {}", status),
            });
        }

        let envelope: ChartResponse =
            response
                .json()
                .await
                .map_err(|e| StockDataError::MalformedResponse {
                    message: format!("chart payload: {}", e),
                })?;

        // An empty result array is "no such security", not a zero-valued success
        envelope
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| StockDataError::InstrumentNotFound(symbol.to_string()))
    }
}

impl Default for YahooChartClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChartProvider for YahooChartClient {
    fn id(&self) -> &'static str {
        PROVIDER_YAHOO
    }

    async fn fetch_info(&self, symbol: &str) -> Result<StockInfo, StockDataError> {
        let end = Utc::now();
        let start = end - ChronoDuration::days(INFO_LOOKBACK_DAYS);
        let result = self.fetch_chart(symbol, start, end).await?;
        extract_identity(&result, symbol)
    }

    async fn fetch_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, StockDataError> {
        let result = self.fetch_chart(symbol, start, end).await?;
        extract_series(&result)
    }
}

// ============================================================================
// Envelope Extraction
// ============================================================================

/// Build a [`StockInfo`] from the envelope's identity metadata.
///
/// Name preference: long name, else short name, else the raw symbol; the
/// result is never empty. Currency: explicit non-empty metadata, else
/// inferred from the symbol suffix.
fn extract_identity(result: &ChartResult, symbol: &str) -> Result<StockInfo, StockDataError> {
    let meta = &result.meta;

    let name = meta
        .long_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .or_else(|| meta.short_name.as_deref().filter(|n| !n.trim().is_empty()))
        .unwrap_or(symbol)
        .to_string();

    let currency = meta
        .currency
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.to_uppercase())
        .unwrap_or_else(|| infer_currency(symbol).to_string());

    let price = meta
        .regular_market_price
        .and_then(Decimal::from_f64)
        .ok_or_else(|| StockDataError::MalformedResponse {
            message: format!("no market price in chart metadata for {}", symbol),
        })?;

    Ok(StockInfo::new(symbol, name, price, currency))
}

/// Build the time-ascending closing series from the envelope's parallel
/// arrays.
///
/// The timestamp and close arrays must be the same length. Null and
/// non-positive closes are "no trade" sentinels and are dropped. The output
/// is sorted: upstream ordering is undocumented and not relied upon.
fn extract_series(result: &ChartResult) -> Result<Vec<PricePoint>, StockDataError> {
    let closes: &[Option<f64>] = result
        .indicators
        .quote
        .first()
        .map(|q| q.close.as_slice())
        .unwrap_or(&[]);

    if result.timestamp.len() != closes.len() {
        return Err(StockDataError::MalformedResponse {
            message: format!(
                "timestamp/close length mismatch: {} vs {}",
                result.timestamp.len(),
                closes.len()
            ),
        });
    }

    let mut points = Vec::with_capacity(closes.len());
    for (ts, close) in result.timestamp.iter().zip(closes.iter()) {
        let raw = match close {
            Some(value) if *value > 0.0 => *value,
            _ => continue,
        };

        let timestamp = match Utc.timestamp_opt(*ts, 0).single() {
            Some(t) => t,
            None => {
                warn!("Skipping price point with invalid timestamp {}", ts);
                continue;
            }
        };

        let close = match Decimal::from_f64(raw) {
            Some(d) => d,
            None => {
                warn!("Skipping price point with unrepresentable close {}", raw);
                continue;
            }
        };

        points.push(PricePoint::new(timestamp, close));
    }

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse_result(json: &str) -> ChartResult {
        let envelope: ChartResponse = serde_json::from_str(json).unwrap();
        envelope.chart.result.unwrap().into_iter().next().unwrap()
    }

    fn envelope_with_meta(meta: &str) -> String {
        format!(
            r#"{{"chart": {{"result": [{{"meta": {}, "timestamp": [], "indicators": {{"quote": [{{"close": []}}]}}}}]}}}}"#,
            meta
        )
    }

    #[test]
    fn test_extract_identity_prefers_long_name() {
        let result = parse_result(&envelope_with_meta(
            r#"{"currency": "USD", "regularMarketPrice": 189.84,
                "longName": "Apple Inc.", "shortName": "Apple"}"#,
        ));
        let info = extract_identity(&result, "AAPL").unwrap();
        assert_eq!(info.name, "Apple Inc.");
        assert_eq!(info.current_price, dec!(189.84));
        assert_eq!(info.currency, "USD");
    }

    #[test]
    fn test_extract_identity_falls_back_to_short_name() {
        let result = parse_result(&envelope_with_meta(
            r#"{"currency": "USD", "regularMarketPrice": 10.0, "shortName": "Apple"}"#,
        ));
        let info = extract_identity(&result, "AAPL").unwrap();
        assert_eq!(info.name, "Apple");
    }

    #[test]
    fn test_extract_identity_falls_back_to_symbol() {
        // Empty strings count as absent names
        let result = parse_result(&envelope_with_meta(
            r#"{"currency": "USD", "regularMarketPrice": 10.0, "longName": "", "shortName": ""}"#,
        ));
        let info = extract_identity(&result, "AAPL").unwrap();
        assert_eq!(info.name, "AAPL");
    }

    #[test]
    fn test_extract_identity_infers_currency_from_suffix() {
        let result = parse_result(&envelope_with_meta(
            r#"{"regularMarketPrice": 7.2, "longName": "SPD Bank"}"#,
        ));
        let info = extract_identity(&result, "600000.SS").unwrap();
        assert_eq!(info.currency, "CNY");

        let result = parse_result(&envelope_with_meta(
            r#"{"currency": "", "regularMarketPrice": 10.0}"#,
        ));
        let info = extract_identity(&result, "AAPL").unwrap();
        assert_eq!(info.currency, "USD");
    }

    #[test]
    fn test_extract_identity_uppercases_explicit_currency() {
        let result = parse_result(&envelope_with_meta(
            r#"{"currency": "usd", "regularMarketPrice": 10.0}"#,
        ));
        let info = extract_identity(&result, "AAPL").unwrap();
        assert_eq!(info.currency, "USD");
    }

    #[test]
    fn test_extract_identity_requires_price() {
        let result = parse_result(&envelope_with_meta(r#"{"longName": "Apple Inc."}"#));
        assert!(matches!(
            extract_identity(&result, "AAPL"),
            Err(StockDataError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_extract_series_drops_zero_close_sentinels() {
        let result = parse_result(
            r#"{"chart": {"result": [{
                "meta": {},
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": {"quote": [{"close": [10.0, 0.0, 12.0]}]}
            }]}}"#,
        );
        let series = extract_series(&result).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, Utc.timestamp_opt(1700000000, 0).unwrap());
        assert_eq!(series[0].close, dec!(10.0));
        assert_eq!(series[1].timestamp, Utc.timestamp_opt(1700172800, 0).unwrap());
        assert_eq!(series[1].close, dec!(12.0));
    }

    #[test]
    fn test_extract_series_drops_null_closes() {
        let result = parse_result(
            r#"{"chart": {"result": [{
                "meta": {},
                "timestamp": [1700000000, 1700086400],
                "indicators": {"quote": [{"close": [null, 11.5]}]}
            }]}}"#,
        );
        let series = extract_series(&result).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].close, dec!(11.5));
    }

    #[test]
    fn test_extract_series_rejects_length_mismatch() {
        let result = parse_result(
            r#"{"chart": {"result": [{
                "meta": {},
                "timestamp": [1700000000, 1700086400],
                "indicators": {"quote": [{"close": [10.0]}]}
            }]}}"#,
        );
        assert!(matches!(
            extract_series(&result),
            Err(StockDataError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_extract_series_sorts_defensively() {
        // Upstream ordering is undocumented; out-of-order input is sorted
        let result = parse_result(
            r#"{"chart": {"result": [{
                "meta": {},
                "timestamp": [1700172800, 1700000000],
                "indicators": {"quote": [{"close": [12.0, 10.0]}]}
            }]}}"#,
        );
        let series = extract_series(&result).unwrap();
        assert_eq!(series[0].close, dec!(10.0));
        assert_eq!(series[1].close, dec!(12.0));
        assert!(series[0].timestamp < series[1].timestamp);
    }

    #[test]
    fn test_extract_series_empty_arrays() {
        let result = parse_result(
            r#"{"chart": {"result": [{
                "meta": {},
                "timestamp": [],
                "indicators": {"quote": [{"close": []}]}
            }]}}"#,
        );
        assert!(extract_series(&result).unwrap().is_empty());
    }
}
