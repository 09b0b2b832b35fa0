use async_trait::async_trait;

use crate::errors::CoreError;
use super::traits::PriceProvider;

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance provider, used as the fallback quote source.
///
/// - **Free**: No API key required (unofficial public API).
/// - **Coverage**: Global equities, ETFs and REITs. B3 listings need the
///   exchange suffix, which `exchange_suffix` adds when the identifier has none
///   (e.g. "MXRF11" becomes "MXRF11.SA").
/// - **Price**: close of the latest daily quote, in the listing currency.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
    exchange_suffix: Option<String>,
}

impl YahooFinanceProvider {
    pub fn new(exchange_suffix: Option<String>) -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self {
            connector,
            exchange_suffix: exchange_suffix.filter(|s| !s.trim().is_empty()),
        })
    }

    /// Map a form identifier to a Yahoo symbol.
    #[must_use]
    pub fn yahoo_symbol(&self, identifier: &str) -> String {
        let upper = identifier.trim().to_uppercase();
        match &self.exchange_suffix {
            Some(suffix) if !upper.contains('.') => format!("{upper}{}", suffix.to_uppercase()),
            _ => upper,
        }
    }
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let yahoo_symbol = self.yahoo_symbol(symbol);
        let resp = self
            .connector
            .get_latest_quotes(&yahoo_symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to fetch latest quote for {yahoo_symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("No quote data for {yahoo_symbol}: {e}"),
        })?;

        Ok(quote.close)
    }
}
