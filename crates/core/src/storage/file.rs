//! JSON file backends (native only, not WASM).

#![cfg(not(target_arch = "wasm32"))]

use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::asset::AssetEntry;
use crate::models::configuration::{NamedConfiguration, SessionState};

use super::document::ConfigurationDocument;
use super::traits::{ConfigurationStore, SessionStore};

/// Named configurations persisted as one JSON document on disk.
///
/// The whole document is rewritten after every mutation. Writes go to a
/// sibling temp file that is then renamed over the target, so a crash never
/// leaves a half-written document behind.
#[derive(Debug)]
pub struct JsonFileConfigurationStore {
    path: PathBuf,
    document: ConfigurationDocument,
}

impl JsonFileConfigurationStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let document = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            ConfigurationDocument::from_json(&json)?
        } else {
            log::info!("Creating configuration store at {}", path.display());
            ConfigurationDocument::default()
        };
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), CoreError> {
        write_atomically(&self.path, &self.document.to_json()?)
    }
}

impl ConfigurationStore for JsonFileConfigurationStore {
    fn save(&mut self, name: &str, goal: &str, assets: &[AssetEntry]) -> Result<(), CoreError> {
        let previous = self.document.clone();
        self.document.upsert(name, goal, assets)?;
        if let Err(e) = self.persist() {
            self.document = previous;
            return Err(e);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.document.names())
    }

    fn load(&self, name: &str) -> Result<NamedConfiguration, CoreError> {
        self.document.get(name)
    }

    fn delete(&mut self, name: &str) -> Result<(), CoreError> {
        let previous = self.document.clone();
        self.document.remove(name)?;
        if let Err(e) = self.persist() {
            self.document = previous;
            return Err(e);
        }
        Ok(())
    }

    fn all(&self) -> Result<Vec<NamedConfiguration>, CoreError> {
        Ok(self.document.all())
    }
}

/// Session slot persisted as a small JSON file. Clearing removes the file.
#[derive(Debug)]
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileSessionStore {
    fn load(&self) -> Result<Option<SessionState>, CoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        let state: SessionState = serde_json::from_str(&json)?;
        Ok(Some(state))
    }

    fn save(&mut self, state: &SessionState) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize session: {e}")))?;
        write_atomically(&self.path, &json)
    }

    fn clear(&mut self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
