use serde::{Deserialize, Serialize};

/// Display-ready projection of one `AllocationPlanRow`.
/// Monetary values have exactly two decimals; units have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub identifier: String,
    pub units_to_buy: String,
    pub cost: String,
    pub payout_achieved: String,
}

/// Display-ready projection of an `AllocationResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayResult {
    pub rows: Vec<DisplayRow>,
    pub total_cost: String,
    pub total_payout: String,
}
