use std::sync::Arc;
use std::time::Duration;

use crate::auth::repo::UserStore;
use crate::config::AppConfig;
use crate::resume::preview::PreviewCache;
use crate::storage::{BlobStore, FileStore};

/// Explicitly constructed application state, passed by reference through the
/// router. There are no process-wide singletons; tests build their own.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
    pub config: Arc<AppConfig>,
    pub preview: PreviewCache,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store: Arc<dyn BlobStore> = Arc::new(FileStore::new(&config.data_dir)?);

        UserStore::new(store.clone())
            .bootstrap_admin(&config.admin)
            .await
            .map_err(|e| anyhow::anyhow!("admin provisioning failed: {e}"))?;

        let preview = PreviewCache::spawn(
            store.clone(),
            Duration::from_millis(config.preview_debounce_ms),
        );

        Ok(Self {
            store,
            config,
            preview,
        })
    }

    pub fn from_parts(store: Arc<dyn BlobStore>, config: Arc<AppConfig>) -> Self {
        let preview = PreviewCache::spawn(
            store.clone(),
            Duration::from_millis(config.preview_debounce_ms),
        );
        Self {
            store,
            config,
            preview,
        }
    }

    /// In-memory state for tests. Must run inside a tokio runtime.
    pub fn fake() -> Self {
        use crate::storage::MemoryStore;

        Self::fake_with_store(Arc::new(MemoryStore::default()))
    }

    /// Test state over an arbitrary store, for exercising storage edge cases.
    pub fn fake_with_store(store: Arc<dyn BlobStore>) -> Self {
        use crate::config::{AdminConfig, JwtConfig};

        let config = Arc::new(AppConfig {
            data_dir: ".".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            admin: AdminConfig::default(),
            preview_debounce_ms: 300,
        });
        Self::from_parts(store, config)
    }
}
