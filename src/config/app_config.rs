use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::llm::DEFAULT_OPENROUTER_BASE_URL;
use crate::infrastructure::storage::StorageConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub storage: StorageSection,
    pub retrieval: RetrievalConfig,
    pub openrouter: OpenRouterSection,
    pub n8n: N8nSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where the key-value store lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// `file` or `memory`
    pub backend: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub term_cache_capacity: u64,
    pub default_top_k: usize,
}

/// OpenRouter connection; an empty key falls back to the stored settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenRouterSection {
    pub base_url: String,
    pub api_key: Option<String>,
    pub default_model: Option<String>,
    pub timeout_secs: u64,
}

/// n8n connection; unset values fall back to the stored settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct N8nSection {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: "data/store.json".to_string(),
        }
    }
}

impl StorageSection {
    pub fn to_storage_config(&self) -> Result<StorageConfig, DomainError> {
        StorageConfig::from_backend(&self.backend, &self.path)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            term_cache_capacity: 1000,
            default_top_k: 3,
        }
    }
}

impl Default for OpenRouterSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            api_key: None,
            default_model: None,
            timeout_secs: 60,
        }
    }
}

impl Default for N8nSection {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
