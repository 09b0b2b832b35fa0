use std::fmt::Write;

use crate::models::allocation::AllocationResult;
use crate::models::display::{DisplayResult, DisplayRow};

/// Read-only projection of an `AllocationResult` for display.
pub struct FormatService;

impl FormatService {
    pub fn new() -> Self {
        Self
    }

    /// Render every row and total; money to two decimals, units as integers.
    /// Row order is preserved.
    #[must_use]
    pub fn format_result(&self, result: &AllocationResult) -> DisplayResult {
        let rows = result
            .rows
            .iter()
            .map(|row| DisplayRow {
                identifier: row.identifier.clone(),
                units_to_buy: row.units_to_buy.to_string(),
                cost: format_money(row.cost),
                payout_achieved: format_money(row.payout_achieved),
            })
            .collect();

        DisplayResult {
            rows,
            total_cost: format_money(result.total_cost),
            total_payout: format_money(result.total_payout),
        }
    }

    /// Plain-text summary: one line per asset, then the totals.
    ///
    /// ```text
    /// Results:
    /// - MXRF11: 200 units (investment: R$ 2000.00, monthly payout: R$ 20.00)
    /// Total investment: R$ 2000.00
    /// Total monthly payout: R$ 20.00
    /// ```
    #[must_use]
    pub fn render_text(&self, display: &DisplayResult, currency_symbol: &str) -> String {
        let mut out = String::from("Results:\n");
        for row in &display.rows {
            let _ = writeln!(
                out,
                "- {}: {} units (investment: {currency_symbol} {}, monthly payout: {currency_symbol} {})",
                row.identifier, row.units_to_buy, row.cost, row.payout_achieved
            );
        }
        let _ = writeln!(out, "Total investment: {currency_symbol} {}", display.total_cost);
        let _ = write!(out, "Total monthly payout: {currency_symbol} {}", display.total_payout);
        out
    }
}

impl Default for FormatService {
    fn default() -> Self {
        Self::new()
    }
}

/// Round half away from zero to cents and print with exactly two decimals.
#[must_use]
pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round();
    // `+ 0.0` turns -0.0 into 0.0 so tiny negatives don't print as "-0.00".
    format!("{:.2}", cents / 100.0 + 0.0)
}
