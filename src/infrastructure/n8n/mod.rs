//! n8n infrastructure - REST client for a remote n8n instance

mod client;

pub use client::{N8nClient, N8nClientConfig};
