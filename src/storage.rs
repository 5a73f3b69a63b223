use crate::{
    domain::KeyValueStorage,
    errors::StorageError,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{
    fs,
    sync::{Mutex, RwLock},
};

/// Volatile store used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Persists every key in a single JSON object file.
///
/// Each call reads (and for `set`, rewrites) the whole file, the same
/// granularity browser local storage gives a page.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    // Serializes writers inside this process only.
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::info!(store_path = %path.display(), "Initializing JsonFileStorage");
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::BackendError(
                    anyhow::Error::new(e).context(format!("Failed to read store file '{}'", self.path.display())),
                ));
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create store directory '{}'", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .context("Failed to encode store contents")?;

        // Write beside the target and rename so readers never see a torn file.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, content)
            .await
            .with_context(|| format!("Failed to write store file '{}'", staging.display()))?;
        fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("Failed to replace store file '{}'", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(StorageError::Corrupt { path, source }) => {
                // Unreadable contents count as absent, same as a malformed key.
                tracing::warn!(store_path = %path, error = %source, "Store file is corrupt, starting a fresh one");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await?;
        tracing::debug!(key, store_path = %self.path.display(), "Store key written");
        Ok(())
    }
}
