use crate::models::settings::Settings;

use super::brapi::BrapiProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;
use super::traits::PriceProvider;

/// Ordered list of price providers.
///
/// Lookups try providers in registration order and fall back to the next
/// one on failure. New providers can be added without touching the others.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();
        let timeout = settings.request_timeout_secs;

        // brapi: B3 quotes, token optional
        let token = settings.api_keys.get("brapi").cloned();
        registry.register(Box::new(BrapiProvider::new(token, timeout)));

        // Yahoo Finance fallback, no key needed
        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        {
            match YahooFinanceProvider::new(settings.exchange_suffix.clone()) {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
            }
        }

        registry
    }

    /// Register a new price provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// All providers, ordered by registration priority.
    pub fn providers(&self) -> Vec<&dyn PriceProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    /// Names of the registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
