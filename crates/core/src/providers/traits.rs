use async_trait::async_trait;

use crate::errors::CoreError;

/// Source of current unit prices, keyed by asset identifier (ticker).
///
/// Each quote API implements this trait. Swapping or adding an API only
/// touches its own implementation; the planner sees `PriceProvider`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the current (latest) price of one unit of `symbol`.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;
}
