use crate::models::allocation::{AllocationPlanRow, AllocationResult, RoundingMode};
use crate::models::asset::ValidAsset;

/// Splits a dividend goal across assets in proportion to their yield and
/// works out how many units of each to buy.
///
/// Pure business logic: no I/O, no shared state, deterministic.
/// Callers must pass a positive goal and at least one `ValidAsset`
/// (the validator guarantees both); inputs are not re-checked here.
pub struct AllocationService {
    rounding: RoundingMode,
}

impl AllocationService {
    /// Engine with the default rounding (always up).
    pub fn new() -> Self {
        Self::with_rounding(RoundingMode::Up)
    }

    pub fn with_rounding(rounding: RoundingMode) -> Self {
        Self { rounding }
    }

    #[must_use]
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Compute the purchase plan.
    ///
    /// 1. `yield_i = payout_i / price_i`
    /// 2. `allocation_i = yield_i / Σ yield * goal`, the payout this asset must produce
    /// 3. `units_i = ceil(allocation_i / payout_i)` (or nearest, if configured)
    /// 4. cost and payout per row, then totals
    ///
    /// Rows come out in input order.
    ///
    /// With `RoundingMode::Up` every row satisfies
    /// `payout_achieved >= allocation` exactly as computed in f64: when
    /// `ceil` lands on a quotient that is already one rounding step short,
    /// one more unit is bought. `total_payout >= goal` holds up to the
    /// relative error of summing the rows (a few ulps of `goal`).
    #[must_use]
    pub fn allocate(&self, goal: f64, assets: &[ValidAsset]) -> AllocationResult {
        if assets.is_empty() {
            return Self::zero_plan(goal, assets);
        }

        let yields: Vec<f64> = assets.iter().map(ValidAsset::yield_ratio).collect();
        let total_yield: f64 = yields.iter().sum();

        debug_assert!(
            total_yield.is_finite() && total_yield > 0.0,
            "total yield must be positive for validated assets, got {total_yield}"
        );

        if !(total_yield.is_finite() && total_yield > 0.0) {
            log::error!(
                "Allocation skipped: total yield is {total_yield} across {} assets",
                assets.len()
            );
            return Self::zero_plan(goal, assets);
        }

        let rows: Vec<AllocationPlanRow> = assets
            .iter()
            .zip(&yields)
            .map(|(asset, yield_ratio)| {
                let allocation = (yield_ratio / total_yield) * goal;
                let units_to_buy = self.round_units(allocation, asset.payout_per_unit);
                Self::plan_row(asset, allocation, units_to_buy)
            })
            .collect();

        let total_cost = rows.iter().map(|r| r.cost).sum();
        let total_payout = rows.iter().map(|r| r.payout_achieved).sum();

        log::debug!(
            "Allocated goal {goal} across {} assets: cost {total_cost}, payout {total_payout}",
            rows.len()
        );

        AllocationResult {
            goal,
            rows,
            total_cost,
            total_payout,
        }
    }

    fn round_units(&self, allocation: f64, payout_per_unit: f64) -> u64 {
        let fractional_units = allocation / payout_per_unit;
        match self.rounding {
            RoundingMode::Up => {
                // Saturating cast: negative/NaN become 0, huge values clamp to u64::MAX.
                let units = fractional_units.ceil() as u64;
                if (units as f64) * payout_per_unit < allocation {
                    units.saturating_add(1)
                } else {
                    units
                }
            }
            RoundingMode::Nearest => fractional_units.round() as u64,
        }
    }

    fn plan_row(asset: &ValidAsset, allocation: f64, units_to_buy: u64) -> AllocationPlanRow {
        let units = units_to_buy as f64;
        AllocationPlanRow {
            id: asset.id,
            identifier: asset.identifier.clone(),
            payout_per_unit: asset.payout_per_unit,
            price_per_unit: asset.price_per_unit,
            allocation,
            units_to_buy,
            cost: units * asset.price_per_unit,
            payout_achieved: units * asset.payout_per_unit,
        }
    }

    fn zero_plan(goal: f64, assets: &[ValidAsset]) -> AllocationResult {
        AllocationResult {
            goal,
            rows: assets.iter().map(|a| Self::plan_row(a, 0.0, 0)).collect(),
            total_cost: 0.0,
            total_payout: 0.0,
        }
    }
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new()
    }
}
