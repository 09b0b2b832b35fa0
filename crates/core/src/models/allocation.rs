use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a fractional unit count is turned into a whole number of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Always round up. The realized payout never falls below the goal.
    #[default]
    Up,
    /// Round to the nearest unit. May undershoot the goal slightly.
    Nearest,
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingMode::Up => write!(f, "Up"),
            RoundingMode::Nearest => write!(f, "Nearest"),
        }
    }
}

/// Purchase plan for one valid asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlanRow {
    /// Id of the form row this plan was computed from
    pub id: Uuid,
    pub identifier: String,
    pub payout_per_unit: f64,
    pub price_per_unit: f64,
    /// Share of the goal assigned to this asset (target payout)
    pub allocation: f64,
    pub units_to_buy: u64,
    /// `units_to_buy * price_per_unit`
    pub cost: f64,
    /// `units_to_buy * payout_per_unit`
    pub payout_achieved: f64,
}

/// Output of the allocation engine. Values keep full precision;
/// rounding for display is done by the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub goal: f64,
    /// One row per valid asset, in input order
    pub rows: Vec<AllocationPlanRow>,
    pub total_cost: f64,
    pub total_payout: f64,
}

impl AllocationResult {
    /// Total units across all rows.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.rows.iter().map(|r| r.units_to_buy).sum()
    }

    /// How far the realized payout exceeds the goal (negative on undershoot).
    #[must_use]
    pub fn overshoot(&self) -> f64 {
        self.total_payout - self.goal
    }
}
