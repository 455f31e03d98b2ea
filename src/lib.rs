//! Stock Data Crate
//!
//! Dual-source stock information retrieval with read-through caching.
//!
//! # Overview
//!
//! The crate supports:
//! - Instrument classification from the ticker string alone
//! - Concurrent dual-source fetching: a primary price/identity provider and,
//!   for mainland-China listings, a secondary localized-name provider
//! - A merge/fallback policy that makes price data mandatory and the
//!   localized name best-effort
//! - A generic read-through TTL cache guarding every entry point
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |      Caller      | --> | StockDataService |  (cache-wrapped entry points)
//! +------------------+     +------------------+
//!                                  |
//!                   miss           v
//!                          +------------------+
//!                          |   MemoryCache    |  (TTL; expired == absent)
//!                          +------------------+
//!                                  |
//!                                  v
//!                +-----------------+-----------------+
//!                |                                   |
//!        +---------------+                 +------------------+
//!        | ChartProvider |                 | LocalizedName    |
//!        |   (primary)   |                 | Provider (2nd)   |
//!        +---------------+                 +------------------+
//!                |                                   |
//!                +---------------+-------------------+
//!                                v
//!                          +------------------+
//!                          |    StockInfo     |  (merged record)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`StockInfo`] - Unified instrument snapshot (identity + latest price)
//! - [`PricePoint`] - Daily closing price observation
//! - [`Period`] - Supported historical range tokens
//! - [`MarketCategory`] - Classification derived from the ticker string
//! - [`StockDataService`] - The cache-wrapped fetch orchestrator
//! - [`StockDataError`] - Fatal outcomes a caller can observe

pub mod cache;
pub mod constants;
pub mod errors;
pub mod models;
pub mod provider;
pub mod service;
pub mod symbol;

// Re-export all public types from models
pub use models::{Period, PricePoint, StockInfo};

// Re-export symbol helpers
pub use symbol::{classify, infer_currency, to_secondary_id, MarketCategory};

// Re-export provider types
pub use provider::{ChartProvider, EastmoneyNameClient, LocalizedNameProvider, YahooChartClient};

// Re-export cache types
pub use cache::{get_or_fetch, Cache, CacheEntry, MemoryCache};

// Re-export service types
pub use service::{StockDataConfig, StockDataService};

// Re-export error types
pub use errors::{NameSourceError, StockDataError};
