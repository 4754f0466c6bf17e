//! Completion provider domain models and traits

mod message;
mod provider;
mod request;
mod response;

pub use message::{Message, MessageRole};
pub use provider::{CompletionProvider, CompletionStream};
pub use request::{CompletionRequest, CompletionRequestBuilder};
pub use response::{
    CompletionResponse, FinishReason, ModelInfo, StreamChunk, Usage, UsageStats,
};

#[cfg(test)]
pub use provider::mock::MockCompletionProvider;
