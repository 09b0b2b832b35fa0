use serde::{Deserialize, Serialize};

use super::asset::AssetEntry;

/// A saved, reusable snapshot of a goal and its asset list.
///
/// Stored as JSON keyed by `name`; saving under an existing name overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedConfiguration {
    pub name: String,

    /// Goal in its text form, as typed
    pub goal: String,

    /// Asset rows in form order
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
}

impl NamedConfiguration {
    pub fn new(name: impl Into<String>, goal: impl Into<String>, assets: Vec<AssetEntry>) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            assets,
        }
    }
}

/// The in-progress form, kept so it can be restored after a reload.
/// Single slot, not keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub goal: String,

    #[serde(default)]
    pub assets: Vec<AssetEntry>,
}

impl SessionState {
    /// `true` when there is nothing worth restoring.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goal.trim().is_empty() && self.assets.is_empty()
    }
}
