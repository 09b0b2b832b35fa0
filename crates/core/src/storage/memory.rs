use crate::errors::CoreError;
use crate::models::asset::AssetEntry;
use crate::models::configuration::{NamedConfiguration, SessionState};

use super::document::ConfigurationDocument;
use super::traits::{ConfigurationStore, SessionStore};

/// Configurations kept in memory only; gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryConfigurationStore {
    document: ConfigurationDocument,
}

impl MemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigurationStore for MemoryConfigurationStore {
    fn save(&mut self, name: &str, goal: &str, assets: &[AssetEntry]) -> Result<(), CoreError> {
        self.document.upsert(name, goal, assets)
    }

    fn list(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.document.names())
    }

    fn load(&self, name: &str) -> Result<NamedConfiguration, CoreError> {
        self.document.get(name)
    }

    fn delete(&mut self, name: &str) -> Result<(), CoreError> {
        self.document.remove(name)
    }

    fn all(&self) -> Result<Vec<NamedConfiguration>, CoreError> {
        Ok(self.document.all())
    }
}

/// Session slot kept in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: Option<SessionState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionState>, CoreError> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &SessionState) -> Result<(), CoreError> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CoreError> {
        self.state = None;
        Ok(())
    }
}
