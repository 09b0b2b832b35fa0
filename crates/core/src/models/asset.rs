use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of user input, exactly as typed into the form.
///
/// Numeric fields are kept as text: half-filled rows are legal and are only
/// parsed (and possibly dropped) when a calculation runs.
/// `identifier` is not unique; two rows may name the same ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    /// Row identity. Older saves without ids get a fresh one on load.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Ticker or display name (e.g. "MXRF11", "HGLG11")
    #[serde(default)]
    pub identifier: String,

    /// Payout per unit per period, as entered (e.g. "0.10")
    #[serde(default)]
    pub payout_per_unit: String,

    /// Price per unit, as entered (e.g. "10.25")
    #[serde(default)]
    pub price_per_unit: String,
}

impl AssetEntry {
    /// A blank row, as created by the "add asset" action.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: String::new(),
            payout_per_unit: String::new(),
            price_per_unit: String::new(),
        }
    }

    pub fn new(
        identifier: impl Into<String>,
        payout_per_unit: impl Into<String>,
        price_per_unit: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identifier: identifier.into(),
            payout_per_unit: payout_per_unit.into(),
            price_per_unit: price_per_unit.into(),
        }
    }

    /// Replace a single field with a new value.
    pub fn set_field(&mut self, field: AssetField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AssetField::Identifier => self.identifier = value,
            AssetField::PayoutPerUnit => self.payout_per_unit = value,
            AssetField::PricePerUnit => self.price_per_unit = value,
        }
    }
}

impl Default for AssetEntry {
    fn default() -> Self {
        Self::empty()
    }
}

/// Editable fields of an `AssetEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetField {
    Identifier,
    PayoutPerUnit,
    PricePerUnit,
}

impl std::fmt::Display for AssetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetField::Identifier => write!(f, "identifier"),
            AssetField::PayoutPerUnit => write!(f, "payout per unit"),
            AssetField::PricePerUnit => write!(f, "price per unit"),
        }
    }
}

/// An `AssetEntry` that passed validation.
///
/// Invariant: `payout_per_unit > 0`, `price_per_unit > 0`, both finite,
/// and `identifier` is non-empty. Only the validator constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidAsset {
    pub id: Uuid,
    pub identifier: String,
    pub payout_per_unit: f64,
    pub price_per_unit: f64,
}

impl ValidAsset {
    pub(crate) fn new(
        id: Uuid,
        identifier: impl Into<String>,
        payout_per_unit: f64,
        price_per_unit: f64,
    ) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            payout_per_unit,
            price_per_unit,
        }
    }

    /// Build from already-parsed numbers. Returns `None` when the values
    /// would break the invariant.
    pub fn try_new(
        identifier: impl Into<String>,
        payout_per_unit: f64,
        price_per_unit: f64,
    ) -> Option<Self> {
        let identifier = identifier.into();
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if identifier.trim().is_empty() || !usable(payout_per_unit) || !usable(price_per_unit) {
            return None;
        }
        Some(Self::new(Uuid::new_v4(), identifier, payout_per_unit, price_per_unit))
    }

    /// Payout per unit divided by price per unit.
    #[must_use]
    pub fn yield_ratio(&self) -> f64 {
        self.payout_per_unit / self.price_per_unit
    }
}
