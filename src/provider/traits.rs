//! Provider trait definitions.
//!
//! The fetch orchestrator depends on these traits rather than the concrete
//! HTTP clients, so providers can be swapped and tests can substitute mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{NameSourceError, StockDataError};
use crate::models::{PricePoint, StockInfo};

/// Primary price/identity source.
///
/// Always consulted; a failure here is fatal to the call.
#[async_trait]
pub trait ChartProvider: Send + Sync {
    /// Provider identifier for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch identity metadata and the latest price for a symbol.
    ///
    /// The returned record's `name` is never empty: the provider falls back
    /// to the raw symbol when upstream metadata carries no name.
    async fn fetch_info(&self, symbol: &str) -> Result<StockInfo, StockDataError>;

    /// Fetch the daily closing series for a symbol over a date range.
    ///
    /// The series is strictly ascending by timestamp and contains only
    /// positive closes.
    async fn fetch_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, StockDataError>;
}

/// Secondary localized-name source for mainland-China listings.
///
/// Conditionally consulted; failures are absorbed by the orchestrator and
/// only ever trigger the name fallback.
#[async_trait]
pub trait LocalizedNameProvider: Send + Sync {
    /// Provider identifier for logging.
    fn id(&self) -> &'static str;

    /// Fetch the localized display name for a converted security id
    /// (e.g. `1.600000`).
    async fn fetch_localized_name(&self, secondary_id: &str) -> Result<String, NameSourceError>;
}
