use async_trait::async_trait;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::configuration::NamedConfiguration;

/// Top-level key every upload is written under.
pub const SAVES_KEY: &str = "saves";

/// Remote copy of all named configurations.
///
/// Uploads replace whatever the remote holds; there is no merge or
/// conflict resolution.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RemoteSync: Send + Sync {
    async fn upload(&self, configurations: &[NamedConfiguration]) -> Result<(), CoreError>;
}

/// Uploads to a JSON-over-REST document store (Firebase Realtime Database
/// style): `PUT {base_url}/saves.json`, optional `auth` query token.
pub struct HttpRemoteSync {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRemoteSync {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Full URL of the saves document.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/{SAVES_KEY}.json", self.base_url)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RemoteSync for HttpRemoteSync {
    async fn upload(&self, configurations: &[NamedConfiguration]) -> Result<(), CoreError> {
        let mut request = self.client.put(self.endpoint()).json(configurations);
        if let Some(token) = &self.token {
            request = request.query(&[("auth", token.as_str())]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::RemoteSync(format!(
                "Upload of {} configurations rejected with status {status}",
                configurations.len()
            )));
        }

        log::info!("Uploaded {} configurations", configurations.len());
        Ok(())
    }
}
