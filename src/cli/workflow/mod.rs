//! Workflow command - generation, deployment and analysis

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::json;
use tracing::info;

use crate::domain::{DomainError, N8nApi};
use crate::infrastructure::services::WorkflowRequirements;
use crate::App;

use super::{print_json, read_json_file};

#[derive(Args)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommand,
}

#[derive(Subcommand)]
pub enum WorkflowCommand {
    /// Generate a workflow from a description
    Generate(GenerateArgs),

    /// List workflows on the configured n8n instance
    List,

    /// Troubleshoot a workflow file
    Troubleshoot {
        file: PathBuf,

        /// Error message reported by n8n
        #[arg(long, default_value = "")]
        error: String,
    },

    /// Analyze a workflow file
    Analyze {
        file: PathBuf,

        /// Also suggest improvements, with optional context
        #[arg(long)]
        suggest: Option<String>,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    pub description: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Trigger type, e.g. webhook or cron
    #[arg(long)]
    pub trigger: Option<String>,

    #[arg(long)]
    pub error_handling: bool,

    #[arg(long)]
    pub logging: bool,

    /// Create the workflow on the n8n instance
    #[arg(long)]
    pub deploy: bool,

    /// Activate the deployed workflow
    #[arg(long, requires = "deploy")]
    pub activate: bool,
}

impl GenerateArgs {
    fn requirements(&self) -> WorkflowRequirements {
        let mut requirements = WorkflowRequirements::default()
            .with_error_handling(self.error_handling)
            .with_logging(self.logging);

        if let Some(ref name) = self.name {
            requirements = requirements.with_name(name.clone());
        }
        if let Some(ref trigger) = self.trigger {
            requirements = requirements.with_trigger_type(trigger.clone());
        }

        requirements
    }
}

pub async fn run(app: &App, args: WorkflowArgs) -> anyhow::Result<()> {
    match args.command {
        WorkflowCommand::Generate(generate) => {
            let workflow = app
                .assistant
                .generate_workflow(&generate.description, &generate.requirements())
                .await?;

            if !generate.deploy {
                return print_json(&workflow);
            }

            let created = app.assistant.deploy_workflow(workflow, generate.activate).await?;
            info!(activate = generate.activate, "Workflow deployed");
            print_json(&created)
        }
        WorkflowCommand::List => {
            let n8n = app.n8n.as_ref().ok_or_else(|| {
                DomainError::configuration("N8N API not configured. Please set API URL and key.")
            })?;
            print_json(&n8n.list_workflows().await?)
        }
        WorkflowCommand::Troubleshoot { file, error } => {
            let workflow = read_json_file(&file).await?;
            let report = app.assistant.troubleshoot_workflow(&workflow, &error).await?;

            println!("{}", report.analysis);
            Ok(())
        }
        WorkflowCommand::Analyze { file, suggest } => {
            let workflow = read_json_file(&file).await?;
            let analysis = app.assistant.analyze_workflow(&workflow).await?;

            match suggest {
                Some(context) => {
                    let suggestions = app
                        .assistant
                        .suggest_improvements(&workflow, &context)
                        .await?;
                    print_json(&json!({
                        "analysis": analysis.text,
                        "suggestions": suggestions.text,
                    }))
                }
                None => {
                    println!("{}", analysis.text);
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_requirements() {
        let args = GenerateArgs {
            description: "sync rows".to_string(),
            name: Some("Rows".to_string()),
            trigger: None,
            error_handling: true,
            logging: false,
            deploy: false,
            activate: false,
        };

        let requirements = args.requirements();

        assert_eq!(requirements.name.as_deref(), Some("Rows"));
        assert!(requirements.trigger_type.is_none());
        assert!(requirements.include_error_handling);
        assert!(!requirements.include_logging);
    }
}
