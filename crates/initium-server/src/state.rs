use std::sync::Arc;

use initium_core::{config::Config, error::StoreError, id::IdGenerator, store::PageViewStore};
use initium_metadata::WebsiteRegistry;
use initium_store::{JsonFileRegistry, JsonFileStore};

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// Built once at startup and shared as `Arc<AppState>`; there is no other
/// process-wide state.
pub struct AppState {
    /// Page view storage. The store owns its own readers-writer lock.
    pub store: Arc<dyn PageViewStore>,

    /// Website registry used to validate tracking ids.
    pub registry: Arc<dyn WebsiteRegistry>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Page view id source shared by all track requests.
    pub ids: IdGenerator,
}

impl AppState {
    pub fn new(
        store: Arc<dyn PageViewStore>,
        registry: Arc<dyn WebsiteRegistry>,
        config: Config,
    ) -> Self {
        Self {
            store,
            registry,
            config: Arc::new(config),
            ids: IdGenerator::new(),
        }
    }

    /// Open the JSON-file store and registry under `config.data_dir`,
    /// creating the directory and default documents on first start.
    pub async fn open(config: Config) -> Result<Self, StoreError> {
        let store = JsonFileStore::open(config.pageviews_path(), config.retention_limit).await?;
        let registry = JsonFileRegistry::open(config.websites_path()).await?;
        Ok(Self::new(Arc::new(store), Arc::new(registry), config))
    }
}
