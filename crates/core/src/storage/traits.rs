use crate::errors::CoreError;
use crate::models::asset::AssetEntry;
use crate::models::configuration::{NamedConfiguration, SessionState};

/// Named configurations, keyed by name.
///
/// Backends decide durability (session-only or on disk); the planner only
/// sees this trait and gets the store injected.
pub trait ConfigurationStore: Send {
    /// Insert or overwrite the configuration called `name`.
    fn save(&mut self, name: &str, goal: &str, assets: &[AssetEntry]) -> Result<(), CoreError>;

    /// Names of all stored configurations, sorted.
    fn list(&self) -> Result<Vec<String>, CoreError>;

    /// Fails with `CoreError::StorageNotFound` if `name` is absent.
    fn load(&self, name: &str) -> Result<NamedConfiguration, CoreError>;

    /// Fails with `CoreError::StorageNotFound` if `name` is absent.
    fn delete(&mut self, name: &str) -> Result<(), CoreError>;

    /// Every stored configuration, ordered by name.
    fn all(&self) -> Result<Vec<NamedConfiguration>, CoreError>;
}

/// Single slot holding the in-progress form.
pub trait SessionStore: Send {
    fn load(&self) -> Result<Option<SessionState>, CoreError>;

    fn save(&mut self, state: &SessionState) -> Result<(), CoreError>;

    fn clear(&mut self) -> Result<(), CoreError>;
}

/// Trim a configuration name and reject empty ones.
pub fn normalize_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(
            "Configuration name must not be empty".into(),
        ));
    }
    Ok(trimmed.to_string())
}
