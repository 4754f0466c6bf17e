//! Storage factory for runtime backend selection

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

use super::file::JsonFileKeyValueStore;
use super::in_memory::InMemoryKeyValueStore;

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory store (for testing/development)
    InMemory,
    /// Single JSON file on disk
    File,
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "file" | "json" => Ok(Self::File),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend: {}. Valid backends: file, memory",
                s
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    File(PathBuf),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Builds a configuration from a backend name and a file path
    pub fn from_backend(backend: &str, path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        Ok(match backend.parse::<StorageType>()? {
            StorageType::InMemory => Self::InMemory,
            StorageType::File => Self::File(path.into()),
        })
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::File(_) => StorageType::File,
        }
    }
}

/// Factory for creating key-value stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Arc<dyn KeyValueStore> {
        match config {
            StorageConfig::InMemory => Arc::new(InMemoryKeyValueStore::new()),
            StorageConfig::File(path) => Arc::new(JsonFileKeyValueStore::new(path.clone())),
        }
    }
}
