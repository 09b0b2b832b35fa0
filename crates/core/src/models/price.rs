use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A price written into an asset row by a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub row_id: Uuid,
    pub identifier: String,
    /// Price text the row held before the refresh
    pub previous_price: String,
    pub price: f64,
    pub fetched_at: DateTime<Utc>,
}

/// A lookup that failed; the row keeps its previous price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLookupFailure {
    pub row_id: Uuid,
    pub identifier: String,
    pub message: String,
}

/// Outcome of refreshing prices for a set of rows.
///
/// Partial success is normal: some rows update, others fail and keep
/// their previous price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    pub updated: Vec<PriceUpdate>,
    pub failed: Vec<PriceLookupFailure>,
    /// Rows with no identifier, never looked up
    pub skipped: usize,
}

impl RefreshReport {
    /// `true` when every attempted lookup succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.updated.len() + self.failed.len()
    }
}
