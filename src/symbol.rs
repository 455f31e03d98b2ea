//! Symbol classification and secondary-provider id conversion.
//!
//! Classification is derived purely from the ticker string and recomputed
//! per call; nothing here performs I/O.

use crate::constants::{
    CASH_RMB_SYMBOL, CASH_USD_SYMBOL, CURRENCY_CNY, CURRENCY_USD, MAINLAND_CODE_LEN,
    SHANGHAI_SECID_PREFIX, SHANGHAI_SUFFIX, SHENZHEN_SECID_PREFIX, SHENZHEN_SUFFIX,
};
use crate::errors::StockDataError;

/// Market category of a ticker symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MarketCategory {
    /// Mainland China, Shanghai Stock Exchange (`.SS` suffix)
    Shanghai,

    /// Mainland China, Shenzhen Stock Exchange (`.SZ` suffix)
    Shenzhen,

    /// Reserved cash pseudo-symbol; never looked up upstream
    CashPseudo,

    /// Everything else
    International,
}

impl MarketCategory {
    /// True for mainland-China listings, where the secondary localized-name
    /// lookup applies.
    pub fn is_mainland(&self) -> bool {
        matches!(self, Self::Shanghai | Self::Shenzhen)
    }
}

/// Classify a ticker string.
///
/// Pure and total: every string maps to exactly one category, defaulting to
/// [`MarketCategory::International`] when no special suffix or reserved
/// literal matches.
pub fn classify(symbol: &str) -> MarketCategory {
    if symbol == CASH_USD_SYMBOL || symbol == CASH_RMB_SYMBOL {
        MarketCategory::CashPseudo
    } else if symbol.ends_with(SHANGHAI_SUFFIX) {
        MarketCategory::Shanghai
    } else if symbol.ends_with(SHENZHEN_SUFFIX) {
        MarketCategory::Shenzhen
    } else {
        MarketCategory::International
    }
}

/// Convert a mainland-China ticker to the secondary provider's
/// exchange-prefixed security id.
///
/// `600000.SS` becomes `1.600000` and `000001.SZ` becomes `0.000001`.
/// Fails with [`StockDataError::InvalidSymbol`] for anything that is not a
/// mainland listing with a 6-digit numeric code; it never guesses.
pub fn to_secondary_id(symbol: &str) -> Result<String, StockDataError> {
    let (suffix, prefix) = match classify(symbol) {
        MarketCategory::Shanghai => (SHANGHAI_SUFFIX, SHANGHAI_SECID_PREFIX),
        MarketCategory::Shenzhen => (SHENZHEN_SUFFIX, SHENZHEN_SECID_PREFIX),
        _ => {
            return Err(StockDataError::InvalidSymbol(format!(
                "{}: not a mainland-China listing",
                symbol
            )))
        }
    };

    let code = symbol.strip_suffix(suffix).unwrap_or(symbol);
    if code.len() != MAINLAND_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StockDataError::InvalidSymbol(format!(
            "{}: expected a {}-digit numeric code",
            symbol, MAINLAND_CODE_LEN
        )));
    }

    Ok(format!("{}{}", prefix, code))
}

/// Infer the trading currency from the symbol suffix.
///
/// Used only when the provider's metadata carries no explicit currency.
pub fn infer_currency(symbol: &str) -> &'static str {
    if classify(symbol).is_mainland() {
        CURRENCY_CNY
    } else {
        CURRENCY_USD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_mainland_suffixes() {
        assert_eq!(classify("600000.SS"), MarketCategory::Shanghai);
        assert_eq!(classify("000001.SZ"), MarketCategory::Shenzhen);
    }

    #[test]
    fn test_classify_cash_pseudo_symbols() {
        assert_eq!(classify("CASH_USD"), MarketCategory::CashPseudo);
        assert_eq!(classify("CASH_RMB"), MarketCategory::CashPseudo);
    }

    #[test]
    fn test_classify_defaults_to_international() {
        assert_eq!(classify("AAPL"), MarketCategory::International);
        assert_eq!(classify("SHOP.TO"), MarketCategory::International);
        assert_eq!(classify(""), MarketCategory::International);
        // Lowercase suffixes are not recognized
        assert_eq!(classify("600000.ss"), MarketCategory::International);
    }

    #[test]
    fn test_to_secondary_id_shanghai() {
        assert_eq!(to_secondary_id("600000.SS").unwrap(), "1.600000");
    }

    #[test]
    fn test_to_secondary_id_shenzhen() {
        assert_eq!(to_secondary_id("000001.SZ").unwrap(), "0.000001");
    }

    #[test]
    fn test_to_secondary_id_rejects_missing_suffix() {
        assert!(matches!(
            to_secondary_id("600000"),
            Err(StockDataError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_to_secondary_id_rejects_bad_code() {
        // Wrong length
        assert!(to_secondary_id("60000.SS").is_err());
        assert!(to_secondary_id("6000000.SZ").is_err());
        // Non-numeric code
        assert!(to_secondary_id("ABCDEF.SS").is_err());
        // Bare suffix
        assert!(to_secondary_id(".SS").is_err());
    }

    #[test]
    fn test_to_secondary_id_rejects_international() {
        assert!(to_secondary_id("AAPL").is_err());
        assert!(to_secondary_id("CASH_USD").is_err());
    }

    #[test]
    fn test_infer_currency() {
        assert_eq!(infer_currency("600000.SS"), "CNY");
        assert_eq!(infer_currency("000001.SZ"), "CNY");
        assert_eq!(infer_currency("AAPL"), "USD");
    }
}
