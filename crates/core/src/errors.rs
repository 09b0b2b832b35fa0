use thiserror::Error;

/// Unified error type for the entire dividend-planner-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Calculation input ───────────────────────────────────────────
    #[error("Invalid dividend goal: {0}")]
    InvalidGoal(String),

    #[error("No asset with valid data (identifier, payout and price must all be filled in)")]
    NoValidAssets,

    // ── Price lookup ────────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No price provider available for {0}")]
    NoProvider(String),

    // ── Named configurations ────────────────────────────────────────
    #[error("Configuration not found: {0}")]
    StorageNotFound(String),

    #[error("Remote sync failed: {0}")]
    RemoteSync(String),

    // ── Form state ──────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Asset row not found: {0}")]
    AssetNotFound(String),

    // ── Serialization / File I/O ────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

impl CoreError {
    /// Errors the user fixes by editing the form (goal or rows).
    /// The UI shows these as a blocking prompt.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidGoal(_)
                | CoreError::NoValidAssets
                | CoreError::StorageNotFound(_)
                | CoreError::ValidationError(_)
        )
    }

    /// Errors from a single price lookup. These never abort a batch refresh.
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            CoreError::Api { .. } | CoreError::Network(_) | CoreError::NoProvider(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Quote and sync URLs carry tokens in the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
