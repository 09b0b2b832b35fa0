use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

use super::allocation::RoundingMode;

/// Default HTTP timeout for price lookups and remote sync.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User-configurable settings.
///
/// Every key is optional in the JSON form; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Symbol printed in front of money values (e.g., "R$", "$").
    pub currency_symbol: String,

    /// Rounding applied to unit counts. Keep `Up` unless the user opts out.
    pub rounding_mode: RoundingMode,

    /// Timeout for a single HTTP request, in seconds.
    pub request_timeout_secs: u64,

    /// Optional API keys for price providers.
    /// Keys: provider name (e.g., "brapi"). Values: the token.
    pub api_keys: HashMap<String, String>,

    /// Exchange suffix appended to bare tickers for Yahoo Finance lookups
    /// (".SA" for B3). `None` sends identifiers unchanged.
    pub exchange_suffix: Option<String>,

    /// Base URL of the remote store that receives uploaded configurations.
    /// `None` disables remote sync.
    pub remote_sync_url: Option<String>,

    /// Auth token appended to remote sync requests.
    pub remote_sync_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            rounding_mode: RoundingMode::Up,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            api_keys: HashMap::new(),
            exchange_suffix: Some(".SA".to_string()),
            remote_sync_url: None,
            remote_sync_token: None,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Load settings from a JSON file (native only, not WASM).
    /// A missing file yields the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values that would make the planner misbehave.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.request_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if let Some(url) = &self.remote_sync_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(CoreError::ValidationError(format!(
                    "remote_sync_url must be an http(s) URL, got '{url}'"
                )));
            }
        }
        Ok(())
    }
}
