//! n8n REST API client over reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::n8n::{ConnectionStatus, ExecutionFilter, N8nApi};
use crate::domain::DomainError;

const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Connection parameters for an n8n instance
#[derive(Debug, Clone)]
pub struct N8nClientConfig {
    /// Base URL of the public API, e.g. `http://localhost:5678/api/v1`
    pub api_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl N8nClientConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct N8nClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl N8nClient {
    pub fn new(config: N8nClientConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
        })
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, DomainError> {
        if self.api_url.is_empty() || self.api_key.is_empty() {
            return Err(DomainError::configuration(
                "N8N API not configured. Please set API URL and key.",
            ));
        }

        let url = format!("{}{}", self.api_url, endpoint);
        debug!(method = %method, url = %url, "n8n API request");

        let sends_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
        let mut request = self
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body.filter(|_| sends_body) {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "n8n API request failed");
            DomainError::provider("n8n", format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::provider("n8n", format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "n8n API error");
            return Err(DomainError::provider(
                "n8n",
                format!("N8N API error ({}): {}", status.as_u16(), text),
            ));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| DomainError::provider("n8n", format!("Failed to parse response: {}", e)))
    }

    async fn get(&self, endpoint: &str) -> Result<Value, DomainError> {
        self.request(Method::GET, endpoint, &[], None).await
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, DomainError> {
        self.request(Method::POST, endpoint, &[], Some(body)).await
    }
}

#[async_trait]
impl N8nApi for N8nClient {
    async fn list_workflows(&self) -> Result<Value, DomainError> {
        self.get("/workflows").await
    }

    async fn get_workflow(&self, id: &str) -> Result<Value, DomainError> {
        self.get(&format!("/workflows/{}", id)).await
    }

    async fn create_workflow(&self, workflow: Value) -> Result<Value, DomainError> {
        self.post("/workflows", &workflow).await
    }

    async fn update_workflow(&self, id: &str, workflow: Value) -> Result<Value, DomainError> {
        self.request(Method::PATCH, &format!("/workflows/{}", id), &[], Some(&workflow))
            .await
    }

    async fn activate_workflow(&self, id: &str) -> Result<Value, DomainError> {
        self.request(Method::POST, &format!("/workflows/{}/activate", id), &[], None)
            .await
    }

    async fn deactivate_workflow(&self, id: &str) -> Result<Value, DomainError> {
        self.request(Method::POST, &format!("/workflows/{}/deactivate", id), &[], None)
            .await
    }

    async fn execute_workflow(&self, id: &str, data: Value) -> Result<Value, DomainError> {
        self.post(&format!("/workflows/{}/run", id), &data).await
    }

    async fn credential_types(&self) -> Result<Value, DomainError> {
        self.get("/credentials/schema").await
    }

    async fn credential_schema(&self, credential_type: &str) -> Result<Value, DomainError> {
        self.get(&format!("/credentials/schema/{}", credential_type))
            .await
    }

    async fn create_credential(&self, credential: Value) -> Result<Value, DomainError> {
        self.post("/credentials", &credential).await
    }

    async fn list_credentials(&self) -> Result<Value, DomainError> {
        self.get("/credentials").await
    }

    async fn list_executions(&self, filter: ExecutionFilter) -> Result<Value, DomainError> {
        self.request(Method::GET, "/executions", &filter.query_pairs(), None)
            .await
    }

    async fn get_execution(&self, id: &str) -> Result<Value, DomainError> {
        self.get(&format!("/executions/{}", id)).await
    }

    async fn workflow_logs(&self, workflow_id: &str) -> Result<Value, DomainError> {
        self.get(&format!("/workflows/{}/logs", workflow_id)).await
    }

    async fn test_connection(&self) -> ConnectionStatus {
        match self.get("/").await {
            Ok(_) => ConnectionStatus::ok("Connection successful"),
            Err(e) => ConnectionStatus::failed(e.to_string()),
        }
    }
}
