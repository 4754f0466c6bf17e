//! JSON file backed key-value store
//!
//! The whole store is one JSON object on disk. Every write rewrites the file
//! through a temporary sibling and a rename, so a crash never leaves a
//! half-written store behind.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

type Entries = BTreeMap<String, Value>;

#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, DomainError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read store file '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }

        serde_json::from_slice(&raw).map_err(|e| {
            DomainError::storage(format!(
                "Store file '{}' is not a JSON object: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn save(&self, entries: &Entries) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| DomainError::storage(format!("Failed to serialize store: {}", e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body).await.map_err(|e| {
            DomainError::storage(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), keys = entries.len(), "Store file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value);
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;

        if entries.remove(key).is_none() {
            return Ok(false);
        }

        self.save(&entries).await?;
        Ok(true)
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_keys().collect())
    }
}
