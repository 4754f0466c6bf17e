//! Settings service - Persisted user settings and a small TTL item cache

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::settings::{deep_merge, get_path, set_path, CacheItem, Settings};
use crate::domain::storage::{KeyValueStore, KeyValueStoreExt};
use crate::domain::DomainError;

/// Store key of the settings record
pub const SETTINGS_KEY: &str = "settings";

/// Store key of the item cache
pub const CACHE_KEY: &str = "cache";

type CacheMap = BTreeMap<String, CacheItem>;

/// Settings service backed by a key-value store
#[derive(Debug, Clone)]
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the stored settings, saving the defaults first when none exist
    pub async fn initialize(&self) -> Result<Settings, DomainError> {
        if let Some(settings) = self.store.get_typed::<Settings>(SETTINGS_KEY).await? {
            return Ok(settings);
        }

        let settings = Settings::default();
        self.save_settings(&settings).await?;
        info!("Default settings saved");
        Ok(settings)
    }

    /// Stored settings, or the defaults when none were saved
    pub async fn get_settings(&self) -> Result<Settings, DomainError> {
        Ok(self
            .store
            .get_typed::<Settings>(SETTINGS_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), DomainError> {
        self.store.set_typed(SETTINGS_KEY, settings).await
    }

    /// Deep-merges `patch` onto the current settings and saves the result
    pub async fn update_settings(&self, patch: Value) -> Result<Settings, DomainError> {
        if !patch.is_object() {
            return Err(DomainError::validation("Settings update must be a JSON object"));
        }

        let current = self.current_value().await?;
        let settings = Self::from_value(deep_merge(&current, &patch))?;

        self.save_settings(&settings).await?;
        Ok(settings)
    }

    /// Reads one setting by dotted path, e.g. `dockerConfig.port`
    pub async fn get_setting(&self, path: &str) -> Result<Option<Value>, DomainError> {
        let current = self.current_value().await?;
        Ok(get_path(&current, path).cloned())
    }

    /// Writes one setting by dotted path, creating intermediate objects
    pub async fn set_setting(&self, path: &str, value: Value) -> Result<Settings, DomainError> {
        let mut current = self.current_value().await?;
        set_path(&mut current, path, value)?;
        let settings = Self::from_value(current)?;

        self.save_settings(&settings).await?;
        debug!(path = %path, "Setting updated");
        Ok(settings)
    }

    /// Caches `value` under `key`, returns false when caching is disabled
    ///
    /// When the cache is full the item with the oldest timestamp is evicted.
    /// `ttl_ms` defaults to the configured `maxAge`.
    pub async fn set_cache_item(
        &self,
        key: &str,
        value: Value,
        ttl_ms: Option<u64>,
    ) -> Result<bool, DomainError> {
        self.set_cache_item_at(key, value, ttl_ms, Utc::now().timestamp_millis())
            .await
    }

    /// Cached value under `key`; expired items are deleted and reported as absent
    pub async fn get_cache_item(&self, key: &str) -> Result<Option<Value>, DomainError> {
        self.get_cache_item_at(key, Utc::now().timestamp_millis())
            .await
    }

    /// Clears one item, or the whole cache when `key` is `None`
    pub async fn clear_cache(&self, key: Option<&str>) -> Result<(), DomainError> {
        match key {
            Some(key) => {
                let mut cache = self.cache().await?;
                if cache.remove(key).is_some() {
                    self.save_cache(&cache).await?;
                }
                Ok(())
            }
            None => self.save_cache(&CacheMap::new()).await,
        }
    }

    async fn set_cache_item_at(
        &self,
        key: &str,
        value: Value,
        ttl_ms: Option<u64>,
        now: i64,
    ) -> Result<bool, DomainError> {
        let settings = self.get_settings().await?;
        if !settings.cache.enabled {
            return Ok(false);
        }

        let mut cache = self.cache().await?;

        if cache.len() >= settings.cache.max_size {
            let oldest = cache
                .iter()
                .min_by_key(|(_, item)| item.timestamp)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!(key = %oldest, "Evicting oldest cache item");
                cache.remove(&oldest);
            }
        }

        let ttl = ttl_ms.unwrap_or(settings.cache.max_age);
        let expires_at = now.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX));

        cache.insert(
            key.to_string(),
            CacheItem {
                value,
                timestamp: now,
                expires_at,
            },
        );

        self.save_cache(&cache).await?;
        Ok(true)
    }

    async fn get_cache_item_at(&self, key: &str, now: i64) -> Result<Option<Value>, DomainError> {
        let mut cache = self.cache().await?;

        let Some(item) = cache.get(key) else {
            return Ok(None);
        };

        if item.is_expired(now) {
            cache.remove(key);
            self.save_cache(&cache).await?;
            return Ok(None);
        }

        Ok(Some(item.value.clone()))
    }

    async fn current_value(&self) -> Result<Value, DomainError> {
        let settings = self.get_settings().await?;
        serde_json::to_value(settings)
            .map_err(|e| DomainError::internal(format!("Failed to serialize settings: {}", e)))
    }

    fn from_value(value: Value) -> Result<Settings, DomainError> {
        serde_json::from_value(value)
            .map_err(|e| DomainError::validation(format!("Invalid settings: {}", e)))
    }

    async fn cache(&self) -> Result<CacheMap, DomainError> {
        Ok(self
            .store
            .get_typed::<CacheMap>(CACHE_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn save_cache(&self, cache: &CacheMap) -> Result<(), DomainError> {
        self.store.set_typed(CACHE_KEY, cache).await
    }
}
