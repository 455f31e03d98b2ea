//! Stock information service: classification, concurrent dual-source fetch,
//! merge/fallback, and the cache layer guarding all of it.
//!
//! # Fetch flow
//!
//! ```text
//! caller → cache → (miss) orchestrator → { primary chart fetch   }
//!                                        { secondary name fetch  }  (mainland only)
//!                         merge ← join ←─┘
//!                         cache store → caller
//! ```
//!
//! The two upstream calls inside one fetch run concurrently, so total
//! latency tracks the slower of the two rather than their sum. The
//! secondary call is bounded by its own budget, so it can never delay the
//! price result past that budget. The merge consumes the secondary outcome
//! as an explicit tagged variant; a timed-out lookup's future is dropped and
//! can never retroactively change a record that was already returned.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use log::{debug, warn};
use rust_decimal::Decimal;
use tokio::time::timeout;

use crate::cache::{get_or_fetch, Cache, MemoryCache};
use crate::constants::{
    CASH_RMB_SYMBOL, CASH_USD_SYMBOL, CURRENCY_CNY, CURRENCY_USD, INFO_CACHE_TTL_SECS,
    SECONDARY_TIMEOUT_SECS, SERIES_CACHE_TTL_SECS,
};
use crate::errors::{NameSourceError, StockDataError};
use crate::models::{Period, PricePoint, StockInfo};
use crate::provider::{ChartProvider, LocalizedNameProvider};
use crate::symbol::{classify, to_secondary_id};


lazy_static! {
    /// Reserved cash pseudo-symbols and their fixed (name, currency) pairs.
    static ref CASH_SYMBOLS: HashMap<&'static str, (&'static str, &'static str)> = {
        let mut m = HashMap::new();
        m.insert(CASH_USD_SYMBOL, ("Cash (USD)", CURRENCY_USD));
        m.insert(CASH_RMB_SYMBOL, ("Cash (CNY)", CURRENCY_CNY));
        m
    };
}

/// Service configuration.
#[derive(Clone, Debug)]
pub struct StockDataConfig {
    /// Hard budget for the secondary name lookup inside one fetch.
    pub secondary_timeout: Duration,

    /// Time-to-live for instrument info cache entries.
    pub info_ttl: Duration,

    /// Time-to-live for historical series cache entries.
    pub series_ttl: Duration,
}

impl Default for StockDataConfig {
    fn default() -> Self {
        Self {
            secondary_timeout: Duration::from_secs(SECONDARY_TIMEOUT_SECS),
            info_ttl: Duration::from_secs(INFO_CACHE_TTL_SECS),
            series_ttl: Duration::from_secs(SERIES_CACHE_TTL_SECS),
        }
    }
}

/// Outcome of the secondary name lookup, consumed explicitly by the merge
/// step.
#[derive(Debug)]
enum NameOutcome {
    /// Secondary resolved a non-empty localized name.
    Resolved(String),
    /// The lookup exceeded the secondary budget.
    TimedOut,
    /// Upstream answered with an empty name.
    Empty,
    /// Transport/status failure, or the symbol could not be converted.
    Errored,
    /// The secondary was never started (non-mainland symbol).
    NotDispatched,
}

impl NameOutcome {
    fn reason(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::TimedOut => "timeout",
            Self::Empty => "empty",
            Self::Errored => "error",
            Self::NotDispatched => "not-dispatched",
        }
    }
}

/// Cache-wrapped stock information service.
///
/// The service owns no cross-call state beyond the caches it fronts; every
/// fetch is independent and idempotent.
pub struct StockDataService {
    chart: Arc<dyn ChartProvider>,
    names: Arc<dyn LocalizedNameProvider>,
    info_cache: MemoryCache<String, StockInfo>,
    series_cache: MemoryCache<(String, Period), Vec<PricePoint>>,
    config: StockDataConfig,
}

impl StockDataService {
    /// Create a service with default configuration.
    pub fn new(chart: Arc<dyn ChartProvider>, names: Arc<dyn LocalizedNameProvider>) -> Self {
        Self::with_config(chart, names, StockDataConfig::default())
    }

    /// Create a service with custom timeouts and TTLs.
    pub fn with_config(
        chart: Arc<dyn ChartProvider>,
        names: Arc<dyn LocalizedNameProvider>,
        config: StockDataConfig,
    ) -> Self {
        Self {
            chart,
            names,
            info_cache: MemoryCache::new(),
            series_cache: MemoryCache::new(),
            config,
        }
    }

    /// Get the unified info record for a symbol.
    ///
    /// Cash pseudo-symbols return a fixed synthetic record with zero
    /// upstream calls. Everything else is answered from the cache when a
    /// valid entry exists, else fetched, merged, and cached.
    pub async fn get_stock_info(&self, symbol: &str) -> Result<StockInfo, StockDataError> {
        let symbol = validate_symbol(symbol)?;

        if let Some((name, currency)) = CASH_SYMBOLS.get(symbol) {
            return Ok(StockInfo::new(symbol, *name, Decimal::ONE, *currency));
        }

        get_or_fetch(
            &self.info_cache,
            symbol.to_string(),
            self.config.info_ttl,
            || self.fetch_info_uncached(symbol),
        )
        .await
    }

    /// Get the daily closing series for a symbol over a period token
    /// (`1mo`, `3mo`, `6mo`, `1y`, `5y`).
    ///
    /// Cash pseudo-symbols have no market history and return an empty
    /// series with zero upstream calls.
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<Vec<PricePoint>, StockDataError> {
        let symbol = validate_symbol(symbol)?;
        let period: Period = period.parse()?;

        if CASH_SYMBOLS.contains_key(symbol) {
            return Ok(Vec::new());
        }

        get_or_fetch(
            &self.series_cache,
            (symbol.to_string(), period),
            self.config.series_ttl,
            || async move {
                let (start, end) = period.as_range();
                self.chart.fetch_series(symbol, start, end).await
            },
        )
        .await
    }

    /// Drop any cached entries for a symbol, forcing the next call to hit
    /// upstream.
    pub fn invalidate_symbol(&self, symbol: &str) {
        self.info_cache.invalidate(&symbol.to_string());
        for period in Period::ALL {
            self.series_cache.invalidate(&(symbol.to_string(), period));
        }
    }

    /// One uncached fetch: dispatch, join, merge.
    async fn fetch_info_uncached(&self, symbol: &str) -> Result<StockInfo, StockDataError> {
        let category = classify(symbol);

        debug!("Fetching stock info for {} via {}", symbol, self.chart.id());

        let (primary, outcome) = if category.is_mainland() {
            tokio::join!(
                self.chart.fetch_info(symbol),
                self.fetch_name_bounded(symbol)
            )
        } else {
            // Primary-only path; the secondary future is never constructed
            (
                self.chart.fetch_info(symbol).await,
                NameOutcome::NotDispatched,
            )
        };

        // Price data is mandatory; a secondary-only success is never enough
        let mut record = primary?;

        match outcome {
            NameOutcome::Resolved(name) => {
                debug!("Using localized name for {}", symbol);
                record.name = name;
            }
            NameOutcome::NotDispatched => {
                debug!("Secondary name source not dispatched for {}", symbol);
            }
            fallback => {
                warn!(
                    "Localized name unavailable for {} via {} ({}), falling back to primary name",
                    symbol,
                    self.names.id(),
                    fallback.reason()
                );
            }
        }

        Ok(record)
    }

    /// Run the secondary lookup bounded by its own budget.
    ///
    /// The future is dropped when the budget elapses, so a late result can
    /// never reach a record that was already merged and returned.
    async fn fetch_name_bounded(&self, symbol: &str) -> NameOutcome {
        let secondary_id = match to_secondary_id(symbol) {
            Ok(id) => id,
            Err(e) => {
                warn!("Secondary id conversion failed for {}: {}", symbol, e);
                return NameOutcome::Errored;
            }
        };

        match timeout(
            self.config.secondary_timeout,
            self.names.fetch_localized_name(&secondary_id),
        )
        .await
        {
            Ok(Ok(name)) if name.trim().is_empty() => NameOutcome::Empty,
            Ok(Ok(name)) => NameOutcome::Resolved(name),
            Ok(Err(NameSourceError::EmptyName)) => NameOutcome::Empty,
            Ok(Err(NameSourceError::Timeout)) => NameOutcome::TimedOut,
            Ok(Err(e)) => {
                debug!(
                    "Secondary lookup via {} failed for {}: {}",
                    self.names.id(),
                    symbol,
                    e
                );
                NameOutcome::Errored
            }
            Err(_) => NameOutcome::TimedOut,
        }
    }
}

/// Reject empty or whitespace-bearing symbols before any I/O.
fn validate_symbol(symbol: &str) -> Result<&str, StockDataError> {
    let symbol = symbol.trim();
    if symbol.is_empty() || symbol.contains(char::is_whitespace) {
        return Err(StockDataError::InvalidSymbol(symbol.to_string()));
    }
    Ok(symbol)
}
