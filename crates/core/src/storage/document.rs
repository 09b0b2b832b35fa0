use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::asset::AssetEntry;
use crate::models::configuration::NamedConfiguration;

use super::traits::normalize_name;

/// Current document format version.
pub const CURRENT_VERSION: u16 = 1;

/// Value stored under a configuration name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConfiguration {
    pub goal: String,
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
}

/// All named configurations, as written to disk.
///
/// ```json
/// { "version": 1, "configurations": { "FIIs": { "goal": "1000", "assets": [...] } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    pub version: u16,
    #[serde(default)]
    pub configurations: BTreeMap<String, StoredConfiguration>,
}

impl Default for ConfigurationDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            configurations: BTreeMap::new(),
        }
    }
}

impl ConfigurationDocument {
    /// Parse a document, rejecting versions this build does not know.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let doc: ConfigurationDocument = serde_json::from_str(json)?;
        if doc.version == 0 || doc.version > CURRENT_VERSION {
            return Err(CoreError::Deserialization(format!(
                "Unsupported configuration document version: {}",
                doc.version
            )));
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize configurations: {e}"))
        })
    }

    pub fn upsert(&mut self, name: &str, goal: &str, assets: &[AssetEntry]) -> Result<(), CoreError> {
        let key = normalize_name(name)?;
        let replaced = self
            .configurations
            .insert(
                key.clone(),
                StoredConfiguration {
                    goal: goal.to_string(),
                    assets: assets.to_vec(),
                },
            )
            .is_some();
        log::info!(
            "{} configuration '{key}' ({} assets)",
            if replaced { "Overwrote" } else { "Saved" },
            assets.len()
        );
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.configurations.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Result<NamedConfiguration, CoreError> {
        let key = name.trim();
        self.configurations
            .get(key)
            .map(|stored| NamedConfiguration::new(key, stored.goal.clone(), stored.assets.clone()))
            .ok_or_else(|| CoreError::StorageNotFound(key.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<(), CoreError> {
        let key = name.trim();
        if self.configurations.remove(key).is_none() {
            return Err(CoreError::StorageNotFound(key.to_string()));
        }
        log::info!("Deleted configuration '{key}'");
        Ok(())
    }

    pub fn all(&self) -> Vec<NamedConfiguration> {
        self.configurations
            .iter()
            .map(|(name, stored)| NamedConfiguration::new(name, stored.goal.clone(), stored.assets.clone()))
            .collect()
    }
}
