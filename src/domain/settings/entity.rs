//! Settings entity and its defaults

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Model used when neither the request nor the settings name one
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct:free";

/// Persisted user settings
///
/// Field names are camelCase in the stored record. Missing fields take their
/// default on load, so older records keep working after new fields appear.
/// Keys outside the known fields are kept in `extra` and written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub open_router_api_key: String,
    pub default_model: String,
    pub theme: String,
    pub n8n_instances: Vec<Value>,
    pub n8n_api_url: String,
    pub n8n_api_key: String,
    pub docker_config: DockerConfig,
    pub cache: CacheConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            open_router_api_key: String::new(),
            default_model: DEFAULT_MODEL.to_string(),
            theme: "light".to_string(),
            n8n_instances: Vec::new(),
            n8n_api_url: String::new(),
            n8n_api_key: String::new(),
            docker_config: DockerConfig::default(),
            cache: CacheConfig::default(),
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Returns true when both the n8n URL and key are set
    pub fn has_n8n_api(&self) -> bool {
        !self.n8n_api_url.is_empty() && !self.n8n_api_key.is_empty()
    }
}

/// Local n8n container parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DockerConfig {
    pub port: u16,
    pub data_path: String,
    pub protocol: String,
    pub host: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            port: 5678,
            data_path: "./n8n-data".to_string(),
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            extra: Map::new(),
        }
    }
}

/// Item cache policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Default time-to-live in milliseconds
    pub max_age: u64,
    /// Maximum number of cached items
    pub max_size: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age: 3_600_000,
            max_size: 50,
            extra: Map::new(),
        }
    }
}

/// A cached value with its write time and expiry, both in epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheItem {
    pub value: Value,
    pub timestamp: i64,
    pub expires_at: i64,
}

impl CacheItem {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(json["openRouterApiKey"], "");
        assert_eq!(json["defaultModel"], DEFAULT_MODEL);
        assert_eq!(json["theme"], "light");
        assert_eq!(json["n8nInstances"], serde_json::json!([]));
        assert_eq!(json["n8nApiUrl"], "");
        assert_eq!(json["dockerConfig"]["port"], 5678);
        assert_eq!(json["dockerConfig"]["dataPath"], "./n8n-data");
        assert_eq!(json["cache"]["maxAge"], 3_600_000);
        assert_eq!(json["cache"]["maxSize"], 50);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "openRouterApiKey": "sk-or-123",
            "dockerConfig": { "port": 8080 }
        }))
        .unwrap();

        assert_eq!(settings.open_router_api_key, "sk-or-123");
        assert_eq!(settings.docker_config.port, 8080);
        assert_eq!(settings.docker_config.host, "localhost");
        assert_eq!(settings.default_model, DEFAULT_MODEL);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let record = serde_json::json!({
            "theme": "dark",
            "mcpPlaywrightUrl": "http://localhost:3000",
            "mcp": { "playwright": { "enabled": true } }
        });

        let settings: Settings = serde_json::from_value(record).unwrap();
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.extra["mcpPlaywrightUrl"], "http://localhost:3000");

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["mcpPlaywrightUrl"], "http://localhost:3000");
        assert_eq!(json["mcp"]["playwright"]["enabled"], true);
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn test_has_n8n_api() {
        let mut settings = Settings::default();
        assert!(!settings.has_n8n_api());

        settings.n8n_api_url = "http://localhost:5678/api/v1".to_string();
        settings.n8n_api_key = "key".to_string();
        assert!(settings.has_n8n_api());
    }

    #[test]
    fn test_cache_item_expiry() {
        let item = CacheItem {
            value: serde_json::json!("v"),
            timestamp: 1_000,
            expires_at: 2_000,
        };

        assert!(!item.is_expired(2_000));
        assert!(item.is_expired(2_001));
    }
}
