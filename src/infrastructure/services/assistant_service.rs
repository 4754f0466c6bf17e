//! Assistant service - Retrieval-augmented answers and workflow tooling
//!
//! Every prompt is built from the top matches of the local knowledge base,
//! formatted as `[title]\ncontent\n` blocks, and sent to the completion
//! provider. Generated workflows and nodes come back as JSON values.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::knowledge_base::{
    format_context, DocumentRetriever, NewDocument, RetrievedDocument, SourceRef,
};
use crate::domain::llm::{CompletionProvider, CompletionRequest};
use crate::domain::n8n::N8nApi;
use crate::domain::DomainError;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());

const ANSWER_TOP_K: usize = 3;
const NODE_TOP_K: usize = 2;

/// Answer to a free-form question with the documents it drew on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroubleshootReport {
    pub analysis: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextReport {
    pub text: String,
}

/// Optional constraints for workflow generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowRequirements {
    pub name: Option<String>,
    pub trigger_type: Option<String>,
    pub include_error_handling: bool,
    pub include_logging: bool,
}

impl WorkflowRequirements {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_trigger_type(mut self, trigger_type: impl Into<String>) -> Self {
        self.trigger_type = Some(trigger_type.into());
        self
    }

    pub fn with_error_handling(mut self, enabled: bool) -> Self {
        self.include_error_handling = enabled;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.include_logging = enabled;
        self
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Generated Workflow")
    }

    fn trigger_type(&self) -> &str {
        self.trigger_type.as_deref().unwrap_or("webhook")
    }
}

/// Retrieval-augmented assistant over the knowledge base, a completion
/// provider and an optional n8n instance
pub struct AssistantService {
    retriever: Arc<dyn DocumentRetriever>,
    provider: Arc<dyn CompletionProvider>,
    n8n: Option<Arc<dyn N8nApi>>,
    model: Option<String>,
}

impl std::fmt::Debug for AssistantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantService")
            .field("provider", &self.provider.provider_name())
            .field("n8n", &self.n8n.is_some())
            .field("model", &self.model)
            .finish()
    }
}

impl AssistantService {
    pub fn new(
        retriever: Arc<dyn DocumentRetriever>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            retriever,
            provider,
            n8n: None,
            model: None,
        }
    }

    pub fn with_n8n(mut self, n8n: Arc<dyn N8nApi>) -> Self {
        self.n8n = Some(n8n);
        self
    }

    /// Model used for every request; the provider default applies otherwise
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub async fn answer_question(
        &self,
        question: &str,
        extra_context: &[String],
    ) -> Result<RagAnswer, DomainError> {
        let documents = self.retriever.query(question, ANSWER_TOP_K).await;
        debug!(matches = documents.len(), "Answering question");

        let mut system = format!(
            "You are an N8N workflow expert specializing in triggers, MSPC integrations, \
             workflows, nodes, credentials and troubleshooting. Use the following information \
             to answer the user's question.\n\nCONTEXT INFORMATION:\n{}\n",
            format_context(&documents)
        );

        if !extra_context.is_empty() {
            system.push_str(&format!("\nADDITIONAL CONTEXT:\n{}\n", extra_context.join("\n")));
        }

        system.push_str(
            "\nAnswer based on the provided context. If you don't know the answer, say so \
             clearly. Give specific, actionable advice, with code snippets or configuration \
             examples when relevant.",
        );

        let answer = self.complete(system, question.to_string(), 0.3, 2000).await?;

        Ok(RagAnswer {
            answer,
            sources: sources(&documents),
        })
    }

    pub async fn troubleshoot_workflow(
        &self,
        workflow: &Value,
        error_message: &str,
    ) -> Result<TroubleshootReport, DomainError> {
        let documents = self
            .retriever
            .query(&format!("workflow error troubleshooting {}", error_message), ANSWER_TOP_K)
            .await;

        let system = format!(
            "You are an N8N workflow troubleshooting expert. Analyze the workflow and error \
             message provided and suggest solutions.\n\nTROUBLESHOOTING CONTEXT:\n{}\n\n\
             ERROR MESSAGE:\n{}\n\nProvide a detailed analysis of the issues and specific steps \
             to resolve them.",
            format_context(&documents),
            error_message
        );
        let user = format!("Workflow for troubleshooting:\n\n{}", pretty(workflow));

        let analysis = self.complete(system, user, 0.3, 2000).await?;

        Ok(TroubleshootReport {
            analysis,
            sources: sources(&documents),
        })
    }

    /// Generates a complete workflow as JSON from a description
    pub async fn generate_workflow(
        &self,
        description: &str,
        requirements: &WorkflowRequirements,
    ) -> Result<Value, DomainError> {
        let documents = self
            .retriever
            .query(&format!("workflow structure nodes {}", description), ANSWER_TOP_K)
            .await;

        let system = format!(
            "You are an N8N workflow automation expert. Generate a complete N8N workflow in JSON \
             format from a description. The workflow must be valid and ready to import: include \
             every required node, configure it correctly, connect the nodes and follow N8N best \
             practices.\n\nREFERENCE:\n{}\n\nReturn ONLY the workflow JSON, with no explanation.",
            format_context(&documents)
        );

        let mut user = format!(
            "Create a complete N8N workflow for:\n\n{}\n\nRequirements:\n- Workflow name: {}\n\
             - Trigger type: {}\n",
            description,
            requirements.name(),
            requirements.trigger_type()
        );
        if requirements.include_error_handling {
            user.push_str("- Include error handling\n");
        }
        if requirements.include_logging {
            user.push_str("- Include logging nodes\n");
        }

        let reply = self.complete(system, user, 0.3, 4000).await?;
        extract_json(&reply, "workflow")
    }

    pub async fn create_node(
        &self,
        node_type: &str,
        parameters: &Value,
    ) -> Result<Value, DomainError> {
        self.generate_node("node", node_type, parameters).await
    }

    pub async fn create_trigger(
        &self,
        trigger_type: &str,
        parameters: &Value,
    ) -> Result<Value, DomainError> {
        self.generate_node("trigger", trigger_type, parameters).await
    }

    pub async fn analyze_workflow(&self, workflow: &Value) -> Result<TextReport, DomainError> {
        let system = "You are an N8N workflow automation expert. Analyze the workflow and give \
                      detailed insights: an overview of its purpose, its structure and data \
                      flow, likely bottlenecks, error handling practices and specific \
                      improvements."
            .to_string();
        let user = format!("Analyze the following N8N workflow:\n\n{}", compact(workflow));

        let text = self.complete(system, user, 0.3, 2000).await?;
        Ok(TextReport { text })
    }

    pub async fn suggest_improvements(
        &self,
        workflow: &Value,
        context: &str,
    ) -> Result<TextReport, DomainError> {
        let system = "You are an N8N workflow automation expert. Suggest specific, actionable \
                      improvements to an existing workflow, with implementation examples where \
                      relevant. Consider performance, maintainability and scalability, and keep \
                      the workflow's original purpose."
            .to_string();

        let mut user = format!(
            "Suggest improvements for the following N8N workflow:\n\n{}",
            compact(workflow)
        );
        if !context.is_empty() {
            user.push_str(&format!("\n\nAdditional context: {}", context));
        }

        let text = self.complete(system, user, 0.4, 2000).await?;
        Ok(TextReport { text })
    }

    /// Creates the workflow on the n8n instance, activating it when asked
    pub async fn deploy_workflow(
        &self,
        workflow: Value,
        activate: bool,
    ) -> Result<Value, DomainError> {
        let n8n = self.n8n()?;
        let created = n8n.create_workflow(workflow).await?;

        if activate {
            if let Some(id) = workflow_id(&created) {
                n8n.activate_workflow(&id).await?;
                info!(id = %id, "Workflow deployed and activated");
            }
        }

        Ok(created)
    }

    pub async fn add_to_knowledge_base(&self, document: NewDocument) -> String {
        self.retriever.add_document(document).await
    }

    fn n8n(&self) -> Result<&Arc<dyn N8nApi>, DomainError> {
        self.n8n
            .as_ref()
            .ok_or_else(|| {
                DomainError::configuration("N8N API not configured. Please set API URL and key.")
            })
    }

    async fn generate_node(
        &self,
        kind: &str,
        node_type: &str,
        parameters: &Value,
    ) -> Result<Value, DomainError> {
        let documents = self
            .retriever
            .query(&format!("n8n {} {}", kind, node_type), NODE_TOP_K)
            .await;

        let system = format!(
            "You are an N8N workflow expert specializing in creating {kind}s. Create a valid \
             {kind} node configuration for a {node_type} {kind} with the given parameters.\n\n\
             CONTEXT:\n{context}\n\nReturn ONLY the JSON object for the node, with no additional \
             text. The node needs a unique id, an appropriate name, the correct type and every \
             required parameter.",
            kind = kind,
            node_type = node_type,
            context = format_context(&documents)
        );
        let user = format!(
            "Create a {} {} with these parameters: {}",
            node_type,
            kind,
            pretty(parameters)
        );

        let reply = self.complete(system, user, 0.3, 2000).await?;
        extract_json(&reply, kind)
    }

    async fn complete(
        &self,
        system: String,
        user: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, DomainError> {
        let mut builder = CompletionRequest::prompt(system, user)
            .temperature(temperature)
            .max_tokens(max_tokens);

        if let Some(ref model) = self.model {
            builder = builder.model(model.clone());
        }

        let response = self.provider.complete(builder.build()).await?;
        Ok(response.content().to_string())
    }
}

fn sources(documents: &[RetrievedDocument]) -> Vec<SourceRef> {
    documents.iter().map(RetrievedDocument::source_ref).collect()
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn compact(value: &Value) -> String {
    value.to_string()
}

fn workflow_id(workflow: &Value) -> Option<String> {
    match workflow.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Parses the first fenced code block of `reply`, or the whole reply
fn extract_json(reply: &str, what: &str) -> Result<Value, DomainError> {
    let candidate = CODE_FENCE
        .captures(reply)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or(reply)
        .trim();

    serde_json::from_str(candidate).map_err(|e| {
        DomainError::validation(format!("Generated {} is not valid JSON: {}", what, e))
    })
}
