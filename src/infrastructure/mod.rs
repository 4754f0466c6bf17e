//! Infrastructure layer - Storage, retrieval and external service clients

pub mod docker;
pub mod knowledge_base;
pub mod llm;
pub mod logging;
pub mod n8n;
pub mod services;
pub mod storage;
