//! Configuration defaults and reserved identifiers.

/// Provider identifiers used for logging and error attribution.
pub const PROVIDER_YAHOO: &str = "YAHOO";
pub const PROVIDER_EASTMONEY: &str = "EASTMONEY";

/// Request timeout for the primary chart provider.
pub const PRIMARY_TIMEOUT_SECS: u64 = 10;

/// Budget for the secondary name lookup. Materially shorter than the primary
/// timeout so a hung name lookup can never starve the primary result.
pub const SECONDARY_TIMEOUT_SECS: u64 = 5;

/// Time-to-live for instrument info cache entries.
pub const INFO_CACHE_TTL_SECS: u64 = 60;

/// Time-to-live for historical series cache entries.
pub const SERIES_CACHE_TTL_SECS: u64 = 300;

/// Days of chart history requested when only the identity/price metadata is
/// needed. A multi-day window avoids empty result sets on weekends and
/// market holidays.
pub const INFO_LOOKBACK_DAYS: i64 = 5;

/// Reserved pseudo-symbols for cash positions. These never reach an upstream
/// provider; the service answers them with a fixed synthetic record.
pub const CASH_USD_SYMBOL: &str = "CASH_USD";
pub const CASH_RMB_SYMBOL: &str = "CASH_RMB";

/// Currency codes (ISO 4217).
pub const CURRENCY_USD: &str = "USD";
pub const CURRENCY_CNY: &str = "CNY";

/// Ticker suffixes for mainland-China listings.
pub const SHANGHAI_SUFFIX: &str = ".SS";
pub const SHENZHEN_SUFFIX: &str = ".SZ";

/// Exchange prefixes in the secondary provider's security-id scheme.
pub const SHANGHAI_SECID_PREFIX: &str = "1.";
pub const SHENZHEN_SECID_PREFIX: &str = "0.";

/// Length of a mainland-China numeric security code.
pub const MAINLAND_CODE_LEN: usize = 6;

/// Production base URLs. Clients accept overrides for testing.
pub const YAHOO_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const EASTMONEY_QUOTE_BASE_URL: &str = "https://push2.eastmoney.com";

/// User-Agent sent to upstream providers; some reject clientless requests.
pub const HTTP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
