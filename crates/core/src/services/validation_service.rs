use crate::errors::CoreError;
use crate::models::asset::{AssetEntry, ValidAsset};

/// A goal and asset list that satisfy the allocation engine's preconditions:
/// `goal > 0` and at least one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub goal: f64,
    pub assets: Vec<ValidAsset>,
}

/// Turns raw form input into `ValidatedInput`.
///
/// Rows that are half-filled or nonsensical are dropped silently so the user
/// can leave them in the form; only a bad goal or an empty result is an error.
pub struct ValidationService;

impl ValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Validate the goal text and filter the asset rows.
    ///
    /// Row order of the surviving assets follows the input order.
    pub fn validate(
        &self,
        goal_text: &str,
        entries: &[AssetEntry],
    ) -> Result<ValidatedInput, CoreError> {
        let goal = self.parse_goal(goal_text)?;

        let assets: Vec<ValidAsset> = entries
            .iter()
            .filter_map(|entry| {
                let asset = Self::validate_entry(entry);
                if asset.is_none() {
                    log::debug!(
                        "Dropping asset row {} ('{}'): incomplete or non-positive values",
                        entry.id,
                        entry.identifier
                    );
                }
                asset
            })
            .collect();

        if assets.is_empty() {
            return Err(CoreError::NoValidAssets);
        }

        Ok(ValidatedInput { goal, assets })
    }

    /// Parse the goal. It must be a finite number greater than zero.
    pub fn parse_goal(&self, goal_text: &str) -> Result<f64, CoreError> {
        match parse_decimal(goal_text) {
            Some(goal) if goal > 0.0 => Ok(goal),
            Some(goal) => Err(CoreError::InvalidGoal(format!(
                "must be greater than zero, got {goal}"
            ))),
            None => Err(CoreError::InvalidGoal(format!(
                "'{}' is not a number",
                goal_text.trim()
            ))),
        }
    }

    fn validate_entry(entry: &AssetEntry) -> Option<ValidAsset> {
        let identifier = entry.identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        let payout = parse_decimal(&entry.payout_per_unit).filter(|v| *v > 0.0)?;
        let price = parse_decimal(&entry.price_per_unit).filter(|v| *v > 0.0)?;
        Some(ValidAsset::new(entry.id, identifier, payout, price))
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a decimal typed into the form.
///
/// Accepts `.` as the decimal separator, or a single `,` when no `.` is
/// present ("10,50"). Returns `None` for empty, malformed or non-finite input.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    // f64::from_str accepts "inf" and "NaN"; form input never means those.
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }

    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
