//! Application core.
//!
//! Wires settings, the persistent store, the API client and the page-flow
//! service together, and rebuilds the service when settings change.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::managers::click_history_manager::ClickHistoryCache;
use crate::services::api_client::ApiClient;
use crate::services::recommendation_service::RecommendationService;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
use crate::types::errors::ApiError;
use crate::types::settings::ClientSettings;

/// Page-flow service as wired by [`App`].
pub type AppService = RecommendationService<Arc<dyn KeyValueStore>, ApiClient>;

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    store: Arc<dyn KeyValueStore>,
    api: Arc<ApiClient>,
    service: AppService,
}

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

impl App {
    /// Creates an App persisting click history to the SQLite file at `db_path`.
    ///
    /// `config_path` overrides the platform settings location.
    pub fn new(db_path: &str, config_path: Option<String>) -> AppResult<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(db_path)?);
        Self::with_store(store, config_path)
    }

    /// Creates an App whose click history lives only as long as the process.
    pub fn ephemeral(config_path: Option<String>) -> AppResult<Self> {
        Self::with_store(Arc::new(MemoryStore::new()), config_path)
    }

    /// Creates an App over an arbitrary store.
    pub fn with_store(
        store: Arc<dyn KeyValueStore>,
        config_path: Option<String>,
    ) -> AppResult<Self> {
        let mut settings_engine = SettingsEngine::new(config_path);
        if let Err(e) = settings_engine.load() {
            warn!(
                path = %settings_engine.get_config_path(),
                error = %e,
                "settings unreadable, using defaults"
            );
        }
        settings_engine.apply_env_overrides();
        settings_engine.get_settings().validate()?;

        let (api, service) = build_service(store.clone(), settings_engine.get_settings())
            .map_err(|e| format!("API client init failed: {}", e))?;

        info!(
            base_url = %settings_engine.get_settings().api.base_url,
            "application initialized"
        );

        Ok(Self {
            settings_engine,
            store,
            api,
            service,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        self.settings_engine.get_settings()
    }

    pub fn service(&self) -> &AppService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut AppService {
        &mut self.service
    }

    /// Rebuilds the service from the current settings over the same store.
    ///
    /// Click notifications already in flight on the old client keep running.
    pub fn rebuild_service(&mut self) -> Result<(), ApiError> {
        let (api, service) =
            build_service(self.store.clone(), self.settings_engine.get_settings())?;
        self.api = api;
        self.service = service;
        Ok(())
    }

    /// Gives in-flight click notifications up to `grace` to complete.
    pub async fn flush_notifications(&self, grace: Duration) {
        self.api.flush_notifications(grace).await;
    }
}

fn build_service(
    store: Arc<dyn KeyValueStore>,
    settings: &ClientSettings,
) -> Result<(Arc<ApiClient>, AppService), ApiError> {
    let api = Arc::new(ApiClient::new(&settings.api)?);
    let mut cache = ClickHistoryCache::with_settings(store, &settings.history);
    if settings.api.track_clicks {
        cache = cache.with_tracker(api.clone());
    }
    let service = RecommendationService::new(cache, api.clone(), &settings.search);
    Ok((api, service))
}
