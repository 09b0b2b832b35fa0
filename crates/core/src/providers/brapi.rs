use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::PriceProvider;

pub const BASE_URL: &str = "https://brapi.dev/api";

const PROVIDER_NAME: &str = "brapi";

/// brapi.dev quote provider for B3 listings (stocks, FIIs, ETFs).
///
/// - **Endpoint**: `GET {base}/quote/{ticker}`
/// - **Token**: optional; sent as the `token` query parameter when set
///   (settings key "brapi"). Without one only a few test tickers are served.
/// - **Price**: `results[0].regularMarketPrice`, in BRL.
pub struct BrapiProvider {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BrapiProvider {
    pub fn new(token: Option<String>, timeout_secs: u64) -> Self {
        Self::with_base_url(BASE_URL, token, timeout_secs)
    }

    /// Point the provider at another host (self-hosted mirror, proxy).
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Extract the current price from a quote response body.
    pub fn parse_quote_response(body: &str, symbol: &str) -> Result<f64, CoreError> {
        let resp: QuoteResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse quote for {symbol}: {e}"),
        })?;

        if resp.error.unwrap_or(false) {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!(
                    "Quote request for {symbol} rejected: {}",
                    resp.message.as_deref().unwrap_or("no message")
                ),
            });
        }

        resp.results
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|r| r.regular_market_price)
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("No current price in quote for {symbol}"),
            })
    }
}

// ── brapi response types ────────────────────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    results: Option<Vec<QuoteResult>>,
    error: Option<bool>,
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResult {
    regular_market_price: Option<f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PriceProvider for BrapiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let ticker = symbol.trim().to_uppercase();
        let url = format!("{}/quote/{ticker}", self.base_url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token.as_str())]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Quote request for {ticker} failed with status {status}"),
            });
        }

        Self::parse_quote_response(&body, &ticker)
    }
}
