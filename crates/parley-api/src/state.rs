//! Application state wiring the cache to its backend.
//!
//! AppState is the composition root: it owns the single `SessionCache`
//! instance and hands it to commands by reference. The cache is generic over
//! the `SessionApi` port, but AppState pins it to the HTTP implementation.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::chat::cache::SessionCache;
use parley_infra::config::{apply_base_url_override, load_client_config};
use parley_infra::filesystem::resolve_data_dir;
use parley_infra::remote::HttpSessionApi;
use parley_types::config::ClientConfig;

/// Concrete cache type pinned to the HTTP API client.
pub type ConcreteSessionCache = SessionCache<HttpSessionApi>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ConcreteSessionCache>,
    pub config: ClientConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration and build the cache.
    ///
    /// `base_url` (from `--base-url` / `PARLEY_BASE_URL`) overrides the file.
    pub async fn init(base_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = apply_base_url_override(load_client_config(&data_dir).await, base_url);

        let api = HttpSessionApi::new(&config)?;
        tracing::debug!(base_url = %api.base_url(), "Session API configured");

        Ok(Self {
            cache: Arc::new(SessionCache::new(api)),
            config,
            data_dir,
        })
    }
}
