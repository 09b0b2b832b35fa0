use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset::AssetEntry;
use crate::models::price::{PriceLookupFailure, PriceUpdate, RefreshReport};
use crate::providers::registry::PriceProviderRegistry;
use crate::providers::traits::PriceProvider;

/// Looks up current unit prices and writes them into asset rows.
///
/// Lookups are advisory: the allocation engine never calls this service,
/// and a failed lookup only means the row keeps the price it had.
///
/// With a lookup timeout set, each provider call is cut off after that long
/// and counts as a failed provider (native targets only; on wasm32 providers
/// must bound their own latency).
pub struct PriceService {
    registry: PriceProviderRegistry,
    lookup_timeout: Option<Duration>,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self {
            registry,
            lookup_timeout: None,
        }
    }

    /// Bound every provider call to `timeout`.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout
    }

    /// Names of the configured providers, in fallback order.
    pub fn get_provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    pub fn has_providers(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Fetch the current price for one identifier, with automatic fallback.
    ///
    /// Tries providers in registration order. A provider that errors or
    /// returns a price that is not finite and positive is skipped.
    pub async fn lookup_current_price(&self, identifier: &str) -> Result<f64, CoreError> {
        let symbol = identifier.trim();
        if symbol.is_empty() {
            return Err(CoreError::ValidationError(
                "Cannot look up a price for an empty identifier".into(),
            ));
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(symbol.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match self.query(*provider, symbol).await {
                Ok(price) if price.is_finite() && price > 0.0 => {
                    log::debug!("{} quoted {symbol} at {price}", provider.name());
                    return Ok(price);
                }
                Ok(price) => {
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid price returned for {symbol}: {price} (must be finite and positive)"
                        ),
                    });
                }
                Err(e) => {
                    log::debug!("{} failed for {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(symbol.to_string())))
    }

    async fn query(&self, provider: &dyn PriceProvider, symbol: &str) -> Result<f64, CoreError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(limit) = self.lookup_timeout {
                return match tokio::time::timeout(limit, provider.get_current_price(symbol)).await {
                    Ok(result) => result,
                    Err(_) => Err(CoreError::Network(format!(
                        "{} timed out after {}ms looking up {symbol}",
                        provider.name(),
                        limit.as_millis()
                    ))),
                };
            }
        }
        provider.get_current_price(symbol).await
    }

    /// Refresh the price of a single row, overwriting only `price_per_unit`.
    pub async fn refresh_price(&self, entry: &mut AssetEntry) -> Result<PriceUpdate, CoreError> {
        let price = self.lookup_current_price(&entry.identifier).await?;
        Ok(apply_price(entry, price))
    }

    /// Refresh every row that has an identifier.
    ///
    /// Lookups run concurrently and each result is written to its own row
    /// as soon as it arrives. A failed lookup is logged and recorded in the
    /// report; it never stops or rolls back the others.
    pub async fn refresh_prices(&self, entries: &mut [AssetEntry]) -> RefreshReport {
        let mut report = RefreshReport::default();
        let mut pending = FuturesUnordered::new();

        for entry in entries.iter() {
            let identifier = entry.identifier.trim().to_string();
            if identifier.is_empty() {
                report.skipped += 1;
                continue;
            }
            let row_id = entry.id;
            pending.push(async move {
                let result = self.lookup_current_price(&identifier).await;
                (row_id, identifier, result)
            });
        }

        while let Some((row_id, identifier, result)) = pending.next().await {
            match result {
                Ok(price) => match find_row(entries, row_id) {
                    Some(entry) => report.updated.push(apply_price(entry, price)),
                    None => log::warn!("Row {row_id} ({identifier}) vanished before its price arrived"),
                },
                Err(e) => {
                    log::warn!("Price refresh failed for {identifier}: {e}");
                    report.failed.push(PriceLookupFailure {
                        row_id,
                        identifier,
                        message: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Price refresh finished: {} updated, {} failed, {} skipped",
            report.updated.len(),
            report.failed.len(),
            report.skipped
        );

        report
    }
}

fn find_row(entries: &mut [AssetEntry], row_id: Uuid) -> Option<&mut AssetEntry> {
    entries.iter_mut().find(|e| e.id == row_id)
}

fn apply_price(entry: &mut AssetEntry, price: f64) -> PriceUpdate {
    let previous_price = std::mem::replace(&mut entry.price_per_unit, price.to_string());
    PriceUpdate {
        row_id: entry.id,
        identifier: entry.identifier.clone(),
        previous_price,
        price,
        fetched_at: chrono::Utc::now(),
    }
}
