use std::sync::Arc;

use daybook_config::DaybookConfig;
use daybook_sync::{LibSqlStore, LocalCache, Reconciler, RemoteStore, UnreachableStore};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: DaybookConfig,
    pub reconciler: Reconciler<Arc<dyn RemoteStore>>,
}

impl AppContext {
    /// Open the configured store and local cache.
    ///
    /// A store that cannot be opened does not abort the run: reads degrade to
    /// the local cache and writes report a connection failure.
    pub async fn init(config: DaybookConfig) -> Self {
        let store: Arc<dyn RemoteStore> = match LibSqlStore::open(&config.store).await {
            Ok(store) => Arc::new(store),
            Err(error) => {
                tracing::warn!(
                    %error,
                    "failed to open task store; continuing with local cache only"
                );
                Arc::new(UnreachableStore::new(error.to_string()))
            }
        };
        let cache = LocalCache::new(config.cache.dir.clone());
        let reconciler = Reconciler::new(store, cache, config.store.timeout());

        Self { config, reconciler }
    }
}
