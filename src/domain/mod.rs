//! Domain layer - Core business logic and entities

pub mod docker;
pub mod error;
pub mod knowledge_base;
pub mod llm;
pub mod n8n;
pub mod settings;
pub mod storage;

pub use docker::{ComposeCommands, ContainerState, ContainerStatus, DockerCommands, DockerOptions};
pub use error::DomainError;
pub use knowledge_base::{
    Document, DocumentMetadata, DocumentRetriever, NewDocument, RetrievedDocument, SourceRef,
};
pub use llm::{
    CompletionProvider, CompletionRequest, CompletionResponse, CompletionStream, Message,
    MessageRole,
};
pub use n8n::{ConnectionStatus, ExecutionFilter, N8nApi};
pub use settings::{CacheConfig, DockerConfig, Settings};
pub use storage::{KeyValueStore, KeyValueStoreExt};
