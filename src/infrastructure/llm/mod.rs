//! Completion provider implementations

mod http_client;
mod openrouter;

pub use http_client::{ByteStream, HttpClient, HttpClientTrait};
pub use openrouter::{OpenRouterConfig, OpenRouterProvider, DEFAULT_OPENROUTER_BASE_URL};
