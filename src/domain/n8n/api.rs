//! n8n REST API trait

use async_trait::async_trait;
use serde_json::Value;

use super::entity::{ConnectionStatus, ExecutionFilter};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Operations against a remote n8n instance
///
/// Workflows, credentials and executions are passed through as raw JSON.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait N8nApi: Send + Sync {
    async fn list_workflows(&self) -> Result<Value, DomainError>;

    async fn get_workflow(&self, id: &str) -> Result<Value, DomainError>;

    async fn create_workflow(&self, workflow: Value) -> Result<Value, DomainError>;

    async fn update_workflow(&self, id: &str, workflow: Value) -> Result<Value, DomainError>;

    async fn activate_workflow(&self, id: &str) -> Result<Value, DomainError>;

    async fn deactivate_workflow(&self, id: &str) -> Result<Value, DomainError>;

    /// Runs a workflow manually with the given input data
    async fn execute_workflow(&self, id: &str, data: Value) -> Result<Value, DomainError>;

    async fn credential_types(&self) -> Result<Value, DomainError>;

    async fn credential_schema(&self, credential_type: &str) -> Result<Value, DomainError>;

    async fn create_credential(&self, credential: Value) -> Result<Value, DomainError>;

    async fn list_credentials(&self) -> Result<Value, DomainError>;

    async fn list_executions(&self, filter: ExecutionFilter) -> Result<Value, DomainError>;

    async fn get_execution(&self, id: &str) -> Result<Value, DomainError>;

    /// Execution logs of one workflow
    async fn workflow_logs(&self, workflow_id: &str) -> Result<Value, DomainError>;

    /// Checks connectivity; failures are reported in the status, never as errors
    async fn test_connection(&self) -> ConnectionStatus;
}
