pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;
pub mod sync;

use models::{
    allocation::{AllocationResult, RoundingMode},
    asset::{AssetEntry, AssetField},
    configuration::SessionState,
    display::DisplayResult,
    price::{PriceUpdate, RefreshReport},
    settings::Settings,
};
use providers::registry::PriceProviderRegistry;
use services::{
    allocation_service::AllocationService, format_service::FormatService,
    price_service::PriceService, validation_service::ValidationService,
};
use storage::{
    memory::{MemoryConfigurationStore, MemorySessionStore},
    traits::{ConfigurationStore, SessionStore},
};
use sync::remote::{HttpRemoteSync, RemoteSync};
use std::time::Duration;
use uuid::Uuid;

use errors::CoreError;

/// Validate, allocate: the whole calculation in one call, with the default
/// (always up) rounding.
pub fn plan(goal_text: &str, entries: &[AssetEntry]) -> Result<AllocationResult, CoreError> {
    plan_with(goal_text, entries, RoundingMode::Up)
}

/// Same as [`plan`] with an explicit rounding mode.
pub fn plan_with(
    goal_text: &str,
    entries: &[AssetEntry],
    rounding: RoundingMode,
) -> Result<AllocationResult, CoreError> {
    let input = ValidationService::new().validate(goal_text, entries)?;
    Ok(AllocationService::with_rounding(rounding).allocate(input.goal, &input.assets))
}

/// Main entry point for the Dividend Planner core library.
/// Holds the form state (goal + asset rows) and the collaborators it talks to.
#[must_use]
pub struct DividendPlanner {
    goal: String,
    assets: Vec<AssetEntry>,
    settings: Settings,
    validation_service: ValidationService,
    allocation_service: AllocationService,
    format_service: FormatService,
    price_service: PriceService,
    /// Set when the registry came from `with_price_registry`; API-key
    /// changes then leave it alone.
    custom_registry: bool,
    store: Box<dyn ConfigurationStore>,
    session: Box<dyn SessionStore>,
    remote: Option<Box<dyn RemoteSync>>,
}

impl std::fmt::Debug for DividendPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DividendPlanner")
            .field("goal", &self.goal)
            .field("assets", &self.assets.len())
            .field("settings", &self.settings)
            .field("providers", &self.price_service.get_provider_names())
            .field("custom_registry", &self.custom_registry)
            .field("remote_sync", &self.remote.is_some())
            .finish()
    }
}

impl DividendPlanner {
    /// Planner with default settings, keeping everything in memory.
    pub fn in_memory() -> Self {
        Self::build(
            Settings::default(),
            Box::new(MemoryConfigurationStore::new()),
            Box::new(MemorySessionStore::new()),
        )
    }

    /// Planner over the given stores. A saved session, if any, is restored;
    /// an unreadable one is discarded and the form starts empty.
    pub fn new(
        settings: Settings,
        store: Box<dyn ConfigurationStore>,
        session: Box<dyn SessionStore>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let mut planner = Self::build(settings, store, session);
        planner.restore_session();
        Ok(planner)
    }

    /// Replace the price providers (custom sources, tests).
    ///
    /// The registry is kept as given: later API-key changes are stored in
    /// the settings but do not rebuild it.
    pub fn with_price_registry(mut self, registry: PriceProviderRegistry) -> Self {
        self.price_service = Self::price_service_for(registry, &self.settings);
        self.custom_registry = true;
        self
    }

    /// Replace the remote sync target.
    pub fn with_remote_sync(mut self, remote: Box<dyn RemoteSync>) -> Self {
        self.remote = Some(remote);
        self
    }

    // ── Form State ──────────────────────────────────────────────────

    /// The goal as typed.
    #[must_use]
    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.goal = goal.into();
        self.persist_session();
    }

    /// Asset rows in form order.
    #[must_use]
    pub fn assets(&self) -> &[AssetEntry] {
        &self.assets
    }

    #[must_use]
    pub fn get_asset(&self, id: Uuid) -> Option<&AssetEntry> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Append a blank row and return its id.
    pub fn add_asset(&mut self) -> Uuid {
        self.add_asset_entry(AssetEntry::empty())
    }

    /// Append a pre-filled row and return its id.
    pub fn add_asset_entry(&mut self, entry: AssetEntry) -> Uuid {
        let id = entry.id;
        self.assets.push(entry);
        self.persist_session();
        id
    }

    /// Replace one field of a row.
    pub fn update_asset(
        &mut self,
        id: Uuid,
        field: AssetField,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        let entry = self
            .assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))?;
        entry.set_field(field, value);
        self.persist_session();
        Ok(())
    }

    /// Remove a row. Removing the last row also clears the saved session.
    pub fn remove_asset(&mut self, id: Uuid) -> Result<AssetEntry, CoreError> {
        let idx = self
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))?;
        let removed = self.assets.remove(idx);

        if self.assets.is_empty() {
            if let Err(e) = self.session.clear() {
                log::warn!("Failed to clear saved session: {e}");
            }
        } else {
            self.persist_session();
        }
        Ok(removed)
    }

    /// Reset the form to an empty goal with no rows.
    pub fn clear_form(&mut self) {
        self.goal.clear();
        self.assets.clear();
        if let Err(e) = self.session.clear() {
            log::warn!("Failed to clear saved session: {e}");
        }
    }

    // ── Calculation ─────────────────────────────────────────────────

    /// Validate the form and compute the purchase plan.
    ///
    /// Fails with `InvalidGoal` or `NoValidAssets`; the engine itself never fails.
    pub fn calculate(&self) -> Result<AllocationResult, CoreError> {
        let input = self.validation_service.validate(&self.goal, &self.assets)?;
        Ok(self.allocation_service.allocate(input.goal, &input.assets))
    }

    /// Calculate and round for display.
    pub fn calculate_display(&self) -> Result<DisplayResult, CoreError> {
        let result = self.calculate()?;
        Ok(self.format_service.format_result(&result))
    }

    /// Calculate and render the plain-text summary.
    pub fn render_summary(&self) -> Result<String, CoreError> {
        let display = self.calculate_display()?;
        Ok(self
            .format_service
            .render_text(&display, &self.settings.currency_symbol))
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Look up the current price of one row and write it into the row.
    /// On failure the row is left unchanged.
    pub async fn refresh_price(&mut self, id: Uuid) -> Result<PriceUpdate, CoreError> {
        let entry = self
            .assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))?;

        let update = match self.price_service.refresh_price(entry).await {
            Ok(update) => update,
            Err(e) => {
                log::warn!("Price refresh failed for {}: {e}", entry.identifier);
                return Err(e);
            }
        };
        self.persist_session();
        Ok(update)
    }

    /// Refresh prices of every row with an identifier. Never fails as a
    /// batch; per-row failures are in the report.
    pub async fn refresh_all_prices(&mut self) -> RefreshReport {
        let report = self.price_service.refresh_prices(&mut self.assets).await;
        if !report.updated.is_empty() {
            self.persist_session();
        }
        report
    }

    /// Names of the configured price providers, in fallback order.
    #[must_use]
    pub fn get_provider_names(&self) -> Vec<String> {
        self.price_service.get_provider_names()
    }

    // ── Named Configurations ────────────────────────────────────────

    /// Save the current form under `name`, overwriting any existing one.
    pub fn save_configuration(&mut self, name: &str) -> Result<(), CoreError> {
        self.store.save(name, &self.goal, &self.assets)
    }

    pub fn list_configurations(&self) -> Result<Vec<String>, CoreError> {
        self.store.list()
    }

    /// Replace the form with a saved configuration.
    pub fn load_configuration(&mut self, name: &str) -> Result<(), CoreError> {
        let config = self.store.load(name)?;
        self.goal = config.goal;
        self.assets = config.assets;
        self.persist_session();
        Ok(())
    }

    pub fn delete_configuration(&mut self, name: &str) -> Result<(), CoreError> {
        self.store.delete(name)
    }

    /// Upload every named configuration to the remote store.
    ///
    /// Errors are logged, never returned. Returns `true` if the upload went
    /// through.
    pub async fn sync_to_remote(&self) -> bool {
        let Some(remote) = &self.remote else {
            log::info!("Remote sync not configured, skipping upload");
            return false;
        };

        let configurations = match self.store.all() {
            Ok(configurations) => configurations,
            Err(e) => {
                log::error!("Error reading configurations for upload: {e}");
                return false;
            }
        };

        match remote.upload(&configurations).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error uploading configurations: {e}");
                false
            }
        }
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Load the saved session into the form, if there is one.
    /// Returns `true` when something was restored.
    ///
    /// A session that cannot be read is logged and cleared; the form is
    /// left as it was.
    pub fn restore_session(&mut self) -> bool {
        match self.session.load() {
            Ok(Some(state)) if !state.is_empty() => {
                log::info!("Restored session with {} assets", state.assets.len());
                self.goal = state.goal;
                self.assets = state.assets;
                true
            }
            Ok(_) => false,
            Err(e) => {
                log::warn!("Discarding unreadable session: {e}");
                if let Err(e) = self.session.clear() {
                    log::warn!("Failed to clear saved session: {e}");
                }
                false
            }
        }
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Choose how unit counts are rounded. `Up` is the default.
    pub fn set_rounding_mode(&mut self, rounding: RoundingMode) {
        if rounding != RoundingMode::Up {
            log::info!("Rounding mode set to {rounding}: plans may undershoot the goal");
        }
        self.settings.rounding_mode = rounding;
        self.allocation_service = AllocationService::with_rounding(rounding);
    }

    pub fn set_currency_symbol(&mut self, symbol: impl Into<String>) {
        self.settings.currency_symbol = symbol.into();
    }

    /// Set an API key for a provider (e.g., "brapi").
    /// Rebuilds the default provider registry so the new key takes effect
    /// immediately. A registry from `with_price_registry` is kept.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.settings.api_keys.insert(provider, key);
        self.rebuild_price_service();
    }

    /// Remove an API key for a provider.
    /// Rebuilds the provider registry so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.settings.api_keys.remove(provider).is_some();
        if removed {
            self.rebuild_price_service();
        }
        removed
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(
        settings: Settings,
        store: Box<dyn ConfigurationStore>,
        session: Box<dyn SessionStore>,
    ) -> Self {
        let registry = PriceProviderRegistry::new_with_defaults(&settings);
        let remote = settings.remote_sync_url.as_ref().map(|url| {
            Box::new(HttpRemoteSync::new(
                url.clone(),
                settings.remote_sync_token.clone(),
                settings.request_timeout_secs,
            )) as Box<dyn RemoteSync>
        });

        Self {
            goal: String::new(),
            assets: Vec::new(),
            validation_service: ValidationService::new(),
            allocation_service: AllocationService::with_rounding(settings.rounding_mode),
            format_service: FormatService::new(),
            price_service: Self::price_service_for(registry, &settings),
            custom_registry: false,
            settings,
            store,
            session,
            remote,
        }
    }

    fn price_service_for(registry: PriceProviderRegistry, settings: &Settings) -> PriceService {
        PriceService::new(registry)
            .with_lookup_timeout(Duration::from_secs(settings.request_timeout_secs))
    }

    fn rebuild_price_service(&mut self) {
        if self.custom_registry {
            log::info!("Keeping custom price providers; API key stored in settings only");
            return;
        }
        let registry = PriceProviderRegistry::new_with_defaults(&self.settings);
        self.price_service = Self::price_service_for(registry, &self.settings);
    }

    /// Write the whole form to the session slot. Failures are logged only;
    /// editing must keep working without a session store.
    fn persist_session(&mut self) {
        let state = SessionState {
            goal: self.goal.clone(),
            assets: self.assets.clone(),
        };
        if let Err(e) = self.session.save(&state) {
            log::warn!("Failed to save session: {e}");
        }
    }
}
