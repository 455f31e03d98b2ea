//! Secondary name provider: the Eastmoney quote API.
//!
//! Fetches only the localized display name for a mainland-China listing,
//! addressed by the exchange-prefixed security id produced by
//! [`crate::symbol::to_secondary_id`]. The client enforces a timeout
//! materially shorter than the primary provider's budget so a hung name
//! lookup can never delay the price result it decorates.
//!
//! An empty name in an otherwise successful response is reported as
//! [`NameSourceError::EmptyName`], the same failure class as a network
//! error, since both mean "fall back to the primary name".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use tracing::debug;
use urlencoding::encode;

use crate::constants::{
    EASTMONEY_QUOTE_BASE_URL, HTTP_USER_AGENT, PROVIDER_EASTMONEY, SECONDARY_TIMEOUT_SECS,
};
use crate::errors::NameSourceError;
use crate::provider::LocalizedNameProvider;

/// Quote API response; only the name field is requested.
#[derive(Debug, Deserialize)]
struct NameResponse {
    /// `null` when the security id is unknown.
    data: Option<NameData>,
}

#[derive(Debug, Deserialize)]
struct NameData {
    /// Localized display name; empty when unknown.
    #[serde(rename = "f58")]
    name: Option<String>,
}

/// Localized-name client.
pub struct EastmoneyNameClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl EastmoneyNameClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(EASTMONEY_QUOTE_BASE_URL)
    }

    /// Create a client against a custom base URL (used by tests and proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(SECONDARY_TIMEOUT_SECS),
        }
    }
}

impl Default for EastmoneyNameClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalizedNameProvider for EastmoneyNameClient {
    fn id(&self) -> &'static str {
        PROVIDER_EASTMONEY
    }

    async fn fetch_localized_name(&self, secondary_id: &str) -> Result<String, NameSourceError> {
        let url = format!(
            "{}/api/qt/stock/get?secid={}&fields=f58",
            self.base_url,
            encode(secondary_id)
        );

        debug!("Fetching localized name for {} from Eastmoney", secondary_id);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .header(header::USER_AGENT, HTTP_USER_AGENT)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NameSourceError::UpstreamStatus(status.as_u16()));
        }

        let payload: NameResponse = response
            .json()
            .await
            .map_err(classify_transport_error)?;

        let name = payload
            .data
            .and_then(|d| d.name)
            .unwrap_or_default();
        let name = name.trim();
        if name.is_empty() {
            return Err(NameSourceError::EmptyName);
        }

        Ok(name.to_string())
    }
}

/// Map a transport failure to its name-source class.
fn classify_transport_error(error: reqwest::Error) -> NameSourceError {
    if error.is_timeout() {
        NameSourceError::Timeout
    } else {
        NameSourceError::Network(error.to_string())
    }
}
