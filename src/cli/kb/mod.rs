//! Knowledge base command - query, list, add and remove documents

use clap::{Args, Subcommand};
use serde_json::json;
use tracing::info;

use crate::domain::{DocumentRetriever, NewDocument};
use crate::App;

use super::print_json;

#[derive(Args)]
pub struct KbArgs {
    #[command(subcommand)]
    pub command: KbCommand,
}

#[derive(Subcommand)]
pub enum KbCommand {
    /// Rank documents against a query
    Query {
        text: String,

        /// Number of results (defaults to the configured value)
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// List stored documents
    List,

    /// Add a document, replacing any document with the same id
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        content: String,

        #[arg(long, default_value = "custom")]
        category: String,

        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        id: Option<String>,
    },

    /// Remove a document by id
    Remove { id: String },
}

pub async fn run(app: &App, args: KbArgs) -> anyhow::Result<()> {
    match args.command {
        KbCommand::Query { text, top_k } => {
            let top_k = top_k.unwrap_or(app.config.retrieval.default_top_k);
            let results = app.retriever.query(&text, top_k).await;

            let rows: Vec<_> = results
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id(),
                        "title": r.title(),
                        "category": r.document.category,
                        "score": r.score,
                    })
                })
                .collect();
            print_json(&rows)
        }
        KbCommand::List => {
            let rows: Vec<_> = app
                .retriever
                .documents()
                .await
                .into_iter()
                .map(|d| {
                    json!({
                        "id": d.id,
                        "title": d.title,
                        "category": d.category,
                        "tags": d.tags,
                    })
                })
                .collect();
            print_json(&rows)
        }
        KbCommand::Add {
            title,
            content,
            category,
            tags,
            id,
        } => {
            let mut document = NewDocument::new(title, content)
                .with_category(category)
                .with_tags(tags);
            if let Some(id) = id {
                document = document.with_id(id);
            }

            let id = app.assistant.add_to_knowledge_base(document).await;
            info!(id = %id, "Document stored");
            print_json(&json!({ "id": id }))
        }
        KbCommand::Remove { id } => {
            let removed = app.retriever.remove_document(&id).await;
            print_json(&json!({ "id": id, "removed": removed }))
        }
    }
}
