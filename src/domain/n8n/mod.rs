//! n8n domain - Remote n8n instance API

mod api;
mod entity;

pub use api::N8nApi;
pub use entity::{ConnectionStatus, ExecutionFilter};

#[cfg(test)]
pub use api::MockN8nApi;
