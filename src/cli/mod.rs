//! CLI module for the n8n assistant
//!
//! Subcommands:
//! - `kb`: query and maintain the knowledge base
//! - `ask`: answer a question from the knowledge base
//! - `workflow`: generate, list, troubleshoot and analyze workflows
//! - `docker`: print docker templates and probe the local container
//! - `settings`: inspect and edit stored settings

pub mod ask;
pub mod docker;
pub mod kb;
pub mod settings;
pub mod workflow;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::App;

/// n8n Assistant - Knowledge base, workflow generation and n8n tooling
#[derive(Parser)]
#[command(name = "n8n-assistant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Query and maintain the knowledge base
    Kb(kb::KbArgs),

    /// Ask a question answered from the knowledge base
    Ask(ask::AskArgs),

    /// Generate, list, troubleshoot and analyze workflows
    Workflow(workflow::WorkflowArgs),

    /// Docker templates and container status
    Docker(docker::DockerArgs),

    /// Inspect and edit stored settings
    Settings(settings::SettingsArgs),
}

/// Loads configuration, installs logging and wires the services
pub async fn bootstrap() -> anyhow::Result<App> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    crate::create_app(config).await
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn read_json_file(path: &std::path::Path) -> anyhow::Result<serde_json::Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path.display(), e))
}
