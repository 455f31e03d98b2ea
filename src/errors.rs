//! Error types for stock data operations.
//!
//! Two error families exist:
//!
//! - [`StockDataError`]: fatal outcomes of a service call. These are the only
//!   errors a caller of the service can observe.
//! - [`NameSourceError`]: failures of the secondary name lookup. These are
//!   absorbed inside the fetch orchestrator; they trigger the name fallback
//!   and a log line, never a failed call.

use thiserror::Error;

/// Errors that can surface from a stock data service call.
#[derive(Error, Debug)]
pub enum StockDataError {
    /// The input symbol is malformed. Fails fast, before any I/O.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// The upstream provider reports no such security.
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    /// The historical range token is not one of the supported periods.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Network failure, timeout, or non-success status from the primary
    /// provider. Fatal to the call: price data is mandatory.
    #[error("Upstream unavailable: {provider} - {message}")]
    UpstreamUnavailable {
        /// The provider that failed
        provider: String,
        /// Description of the failure
        message: String,
    },

    /// The parsed payload did not have the expected shape
    /// (e.g. parallel arrays of different lengths). Never silently coerced.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Description of the shape mismatch
        message: String,
    },
}

/// Failures of the secondary localized-name lookup.
///
/// An empty name in an otherwise successful response is the same failure
/// class as a network error: both mean "no localized name this time" and
/// both trigger the fallback to the primary provider's name.
#[derive(Error, Debug)]
pub enum NameSourceError {
    /// The request exceeded the secondary provider's time budget.
    #[error("request timed out")]
    Timeout,

    /// A transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("upstream status {0}")]
    UpstreamStatus(u16),

    /// A successful response carrying an empty name field.
    #[error("empty name in response")]
    EmptyName,
}
