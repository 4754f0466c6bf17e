use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

use super::response::{ModelInfo, StreamChunk, UsageStats};
use super::{CompletionRequest, CompletionResponse};
use crate::domain::DomainError;

/// Stream type for completion responses
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, DomainError>> + Send>>;

/// Trait for text-generation providers (OpenRouter and compatible APIs)
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, DomainError>;

    /// Send a streaming chat completion request
    async fn complete_stream(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, DomainError>;

    /// List models available to the configured account
    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError>;

    /// Usage and quota of the configured account
    async fn usage_stats(&self) -> Result<UsageStats, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use futures::stream;
    use std::sync::Mutex;

    /// Replays canned replies in order and records every request it receives
    #[derive(Debug, Default)]
    pub struct MockCompletionProvider {
        replies: Mutex<Vec<String>>,
        error: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockCompletionProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_reply(self, reply: impl Into<String>) -> Self {
            self.replies.lock().unwrap().push(reply.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> Option<CompletionRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl CompletionProvider for MockCompletionProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, DomainError> {
            self.requests.lock().unwrap().push(request);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(DomainError::provider("mock", "No mock reply configured"));
            }

            let reply = replies.remove(0);
            Ok(CompletionResponse::new("mock-id", "mock-model", Message::assistant(reply)))
        }

        async fn complete_stream(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionStream, DomainError> {
            let response = self.complete(request).await?;

            let chunks: Vec<Result<StreamChunk, DomainError>> = response
                .content()
                .split_inclusive(' ')
                .map(|piece| Ok(StreamChunk::new("mock-id", "mock-model").with_delta(piece)))
                .collect();

            Ok(Box::pin(stream::iter(chunks)))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
            Ok(vec![ModelInfo {
                id: "mock-model".to_string(),
                name: None,
                context_length: None,
            }])
        }

        async fn usage_stats(&self) -> Result<UsageStats, DomainError> {
            Ok(UsageStats::default())
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
