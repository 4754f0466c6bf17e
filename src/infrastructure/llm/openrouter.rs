//! OpenRouter chat completion provider

use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream, StreamExt};
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use crate::domain::llm::{
    CompletionProvider, CompletionRequest, CompletionResponse, CompletionStream, FinishReason,
    Message, ModelInfo, StreamChunk, Usage, UsageStats,
};
use crate::domain::settings::DEFAULT_MODEL;
use crate::domain::DomainError;

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

const APP_TITLE: &str = "N8N Workflow Assistant";
const DEFAULT_REFERER: &str = "http://localhost";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TOP_P: f32 = 0.9;

/// Connection parameters for OpenRouter
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_model: String,
    pub referer: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

/// OpenRouter API provider
#[derive(Debug)]
pub struct OpenRouterProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    default_model: String,
    referer: String,
}

impl<C: HttpClientTrait> OpenRouterProvider<C> {
    pub fn new(client: C, config: OpenRouterConfig) -> Self {
        let auth_header = Some(config.api_key.trim())
            .filter(|key| !key.is_empty())
            .map(|key| format!("Bearer {}", key));

        Self {
            client,
            auth_header,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_model: config.default_model,
            referer: config.referer,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.auth_header.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self) -> Result<Vec<(&str, &str)>, DomainError> {
        let auth = self
            .auth_header
            .as_deref()
            .ok_or_else(|| DomainError::credential("OpenRouter API key not configured"))?;

        Ok(vec![
            ("Authorization", auth),
            ("Content-Type", "application/json"),
            ("HTTP-Referer", self.referer.as_str()),
            ("X-Title", APP_TITLE),
        ])
    }

    fn build_request(&self, request: &CompletionRequest, stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": request.model.as_deref().unwrap_or(&self.default_model),
            "messages": request.messages,
            "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "top_p": request.top_p.unwrap_or(DEFAULT_TOP_P),
            "frequency_penalty": request.frequency_penalty.unwrap_or(0.0),
            "presence_penalty": request.presence_penalty.unwrap_or(0.0),
            "stream": stream,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<CompletionResponse, DomainError> {
        let response: OpenRouterResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("openrouter", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("openrouter", "No choices in response"))?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());
        let model = response.model.unwrap_or_else(|| self.default_model.clone());

        let mut completion =
            CompletionResponse::new(response.id.unwrap_or_default(), model, message);

        if let Some(reason) = choice.finish_reason {
            completion = completion.with_finish_reason(FinishReason::parse(&reason));
        }

        if let Some(usage) = response.usage {
            completion =
                completion.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(completion)
    }
}

#[async_trait]
impl<C: HttpClientTrait> CompletionProvider for OpenRouterProvider<C> {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, DomainError> {
        let headers = self.headers()?;
        let body = self.build_request(&request, false);

        let response = self
            .client
            .post_json(&self.url("/chat/completions"), headers, &body)
            .await?;

        self.parse_response(response)
    }

    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, DomainError> {
        let headers = self.headers()?;
        let body = self.build_request(&request, true);

        let byte_stream = self
            .client
            .post_json_stream(&self.url("/chat/completions"), headers, &body)
            .await?;

        // SSE events and multibyte characters may be split across network chunks;
        // `None` marks the end of the body so a trailing line is still parsed
        let stream = byte_stream
            .map(Some)
            .chain(stream::once(future::ready(None)))
            .scan(
                Vec::new(),
                |buffer: &mut Vec<u8>, item: Option<Result<Bytes, DomainError>>| {
                    let chunks = match item {
                        Some(Ok(bytes)) => {
                            buffer.extend_from_slice(&bytes);
                            drain_sse_lines(buffer)
                        }
                        Some(Err(e)) => vec![Err(e)],
                        None => flush_sse_buffer(buffer),
                    };
                    future::ready(Some(stream::iter(chunks)))
                },
            )
            .flatten();

        Ok(Box::pin(stream))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
        let headers = self.headers()?;
        let response = self.client.get_json(&self.url("/models"), headers).await?;

        let models: ModelList = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("openrouter", format!("Failed to parse model list: {}", e))
        })?;

        Ok(models.data)
    }

    async fn usage_stats(&self) -> Result<UsageStats, DomainError> {
        let headers = self.headers()?;
        let response = self.client.get_json(&self.url("/auth/key"), headers).await?;

        Ok(UsageStats {
            usage: response["usage"].as_f64().unwrap_or(0.0),
            quota: response["quota"].as_f64().unwrap_or(0.0),
            resets_at: response["resetsAt"].as_str().map(str::to_string),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openrouter"
    }
}

/// Parses every complete line in `buffer`, leaving a trailing partial line
///
/// Lines are decoded only once complete, so a character split between two
/// chunks is reassembled before decoding.
fn drain_sse_lines(buffer: &mut Vec<u8>) -> Vec<Result<StreamChunk, DomainError>> {
    let mut chunks = Vec::new();

    while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=newline).collect();
        if let Some(chunk) = parse_sse_line(String::from_utf8_lossy(&line).trim_end()) {
            chunks.push(Ok(chunk));
        }
    }

    chunks
}

/// Parses whatever is left once the body ends without a final newline
fn flush_sse_buffer(buffer: &mut Vec<u8>) -> Vec<Result<StreamChunk, DomainError>> {
    let line = String::from_utf8_lossy(buffer).trim_end().to_string();
    buffer.clear();

    parse_sse_line(&line).map(Ok).into_iter().collect()
}

fn parse_sse_line(line: &str) -> Option<StreamChunk> {
    let data = line.strip_prefix("data:")?.trim();
    if data == "[DONE]" {
        return None;
    }

    let chunk: OpenRouterStreamChunk = serde_json::from_str(data).ok()?;
    let choice = chunk.choices.into_iter().next()?;

    let mut stream_chunk =
        StreamChunk::new(chunk.id.unwrap_or_default(), chunk.model.unwrap_or_default());

    if let Some(delta) = choice.delta.content {
        stream_chunk = stream_chunk.with_delta(delta);
    }

    if let Some(reason) = choice.finish_reason {
        stream_chunk = stream_chunk.with_finish_reason(FinishReason::parse(&reason));
    }

    Some(stream_chunk)
}

// OpenRouter API types

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OpenRouterChoice>,
    usage: Option<OpenRouterUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenRouterStreamChunk {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OpenRouterStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterStreamChoice {
    #[serde(default)]
    delta: OpenRouterDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenRouterDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}
