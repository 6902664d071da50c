use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Blob holding the serialized user-record mapping.
pub const USER_DATABASE_KEY: &str = "user_database";
/// Blob holding the serialized resume record.
pub const RESUME_DATA_KEY: &str = "resume_data";
/// Blob holding the serialized session marker.
pub const CURRENT_USER_KEY: &str = "current_user";

/// Flat key-value persistence for JSON text blobs under fixed keys.
/// Writes replace the whole blob; there is no atomicity across keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}

/// One JSON file per key under a data directory.
#[derive(Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read blob {}", path.display())),
        }
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        // Write-then-rename so readers never observe a half-written blob.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, value)
            .await
            .with_context(|| format!("write blob {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("rename blob into {}", path.display()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("delete blob {}", path.display())),
        }
    }
}

/// In-memory store used by tests and `AppState::fake()`.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Store whose writes always fail. Tests use it to exercise the
/// non-durable paths: operations still complete in memory, the change
/// just never lands on disk.
#[cfg(test)]
#[derive(Default)]
pub struct WriteFailStore {
    inner: MemoryStore,
}

#[cfg(test)]
#[async_trait]
impl BlobStore for WriteFailStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("simulated write failure")
    }

    async fn delete(&self, _key: &str) -> anyhow::Result<()> {
        anyhow::bail!("simulated write failure")
    }
}
