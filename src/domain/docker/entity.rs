use serde::{Deserialize, Serialize};

use crate::domain::settings::DockerConfig;

/// Name given to the managed n8n container
pub const CONTAINER_NAME: &str = "n8n-browser-agent";

/// Image the generated commands run
pub const N8N_IMAGE: &str = "n8nio/n8n:latest";

/// Placeholder encryption key written into generated templates
pub const DEFAULT_ENCRYPTION_KEY: &str = "change_me_please";

pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Parameters for the generated compose file and run command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerOptions {
    pub port: u16,
    pub protocol: String,
    pub host: String,
    pub data_path: String,
    pub encryption_key: String,
    pub timezone: String,
}

impl Default for DockerOptions {
    fn default() -> Self {
        DockerConfig::default().into()
    }
}

impl From<DockerConfig> for DockerOptions {
    fn from(config: DockerConfig) -> Self {
        Self {
            port: config.port,
            protocol: config.protocol,
            host: config.host,
            data_path: config.data_path,
            encryption_key: DEFAULT_ENCRYPTION_KEY.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl DockerOptions {
    /// Base URL the container is reachable at
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Public webhook URL passed to n8n
    pub fn webhook_url(&self) -> String {
        format!("{}/", self.base_url())
    }
}

/// Lifecycle commands for a plain `docker run` container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerCommands {
    pub start: String,
    pub stop: String,
    pub restart: String,
    pub logs: String,
    pub remove: String,
}

/// Lifecycle commands for a compose deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeCommands {
    pub up: String,
    pub down: String,
    pub restart: String,
    pub logs: String,
    pub pull: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Stopped,
}

/// Result of probing the container's health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStatus {
    pub running: bool,
    pub name: String,
    pub url: Option<String>,
    pub status: ContainerState,
}

impl ContainerStatus {
    pub fn running(url: impl Into<String>) -> Self {
        Self {
            running: true,
            name: CONTAINER_NAME.to_string(),
            url: Some(url.into()),
            status: ContainerState::Running,
        }
    }

    pub fn stopped() -> Self {
        Self {
            running: false,
            name: CONTAINER_NAME.to_string(),
            url: None,
            status: ContainerState::Stopped,
        }
    }
}
