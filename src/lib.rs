//! n8n Assistant
//!
//! A command-line assistant for building and operating n8n workflows:
//! - Lexical retrieval over a persisted n8n knowledge base
//! - Retrieval-augmented answers and workflow generation through OpenRouter
//! - REST access to a running n8n instance
//! - Docker templates for a local n8n container

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use domain::{DockerOptions, DocumentRetriever, KeyValueStore, N8nApi, Settings};
use infrastructure::{
    knowledge_base::{LexicalRetriever, LexicalRetrieverConfig},
    llm::{HttpClient, OpenRouterConfig, OpenRouterProvider},
    n8n::{N8nClient, N8nClientConfig},
    services::{AssistantService, SettingsService},
    storage::StorageFactory,
};
use tracing::{info, warn};

/// Wired application services
pub struct App {
    pub config: AppConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub settings: SettingsService,
    pub retriever: Arc<LexicalRetriever>,
    pub assistant: AssistantService,
    pub n8n: Option<Arc<dyn N8nApi>>,
    pub docker: DockerOptions,
}

/// Builds every service from configuration, falling back to stored settings
/// for credentials the configuration leaves unset
pub async fn create_app(config: AppConfig) -> anyhow::Result<App> {
    let storage_config = config.storage.to_storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Opening store");
    let store = StorageFactory::create(&storage_config);

    let settings = SettingsService::new(store.clone());
    let stored = match settings.initialize().await {
        Ok(stored) => stored,
        Err(e) => {
            warn!(error = %e, "Failed to load settings, using defaults");
            Settings::default()
        }
    };

    let retriever = Arc::new(
        LexicalRetriever::initialize(
            store.clone(),
            LexicalRetrieverConfig::default()
                .with_term_cache_capacity(config.retrieval.term_cache_capacity),
        )
        .await,
    );

    let provider = create_provider(&config, &stored)?;
    let model = config
        .openrouter
        .default_model
        .clone()
        .unwrap_or_else(|| stored.default_model.clone());

    let n8n = create_n8n_client(&config, &stored)?;

    let retriever_handle: Arc<dyn DocumentRetriever> = retriever.clone();
    let mut assistant = AssistantService::new(retriever_handle, provider).with_model(model);
    if let Some(ref client) = n8n {
        assistant = assistant.with_n8n(client.clone());
    }

    let docker = DockerOptions::from(stored.docker_config.clone());

    Ok(App {
        config,
        store,
        settings,
        retriever,
        assistant,
        n8n,
        docker,
    })
}

fn create_provider(
    config: &AppConfig,
    stored: &Settings,
) -> anyhow::Result<Arc<OpenRouterProvider<HttpClient>>> {
    let api_key = non_empty(config.openrouter.api_key.as_deref())
        .unwrap_or(stored.open_router_api_key.as_str())
        .to_string();

    if api_key.is_empty() {
        warn!("No OpenRouter API key configured; completion requests will fail");
    }

    let client = HttpClient::with_timeout(Duration::from_secs(config.openrouter.timeout_secs))?;
    let provider_config = OpenRouterConfig::new(api_key)
        .with_base_url(config.openrouter.base_url.clone())
        .with_default_model(stored.default_model.clone());

    Ok(Arc::new(OpenRouterProvider::new(client, provider_config)))
}

fn create_n8n_client(
    config: &AppConfig,
    stored: &Settings,
) -> anyhow::Result<Option<Arc<dyn N8nApi>>> {
    let api_url = non_empty(config.n8n.api_url.as_deref()).unwrap_or(stored.n8n_api_url.as_str());
    let api_key = non_empty(config.n8n.api_key.as_deref()).unwrap_or(stored.n8n_api_key.as_str());

    let client_config = N8nClientConfig::new(api_url, api_key)
        .with_timeout(Duration::from_secs(config.n8n.timeout_secs));

    if !client_config.is_configured() {
        return Ok(None);
    }

    Ok(Some(Arc::new(N8nClient::new(client_config)?)))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
