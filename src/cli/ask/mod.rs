//! Ask command - answers a question from the knowledge base

use clap::Args;

use crate::App;

use super::print_json;

#[derive(Args)]
pub struct AskArgs {
    pub question: String,

    /// Extra context lines appended to the prompt
    #[arg(long = "context")]
    pub context: Vec<String>,

    /// Print the answer with its sources as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: &App, args: AskArgs) -> anyhow::Result<()> {
    let answer = app
        .assistant
        .answer_question(&args.question, &args.context)
        .await?;

    if args.json {
        return print_json(&answer);
    }

    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for source in &answer.sources {
            println!("  - {} ({}, {:.3})", source.title, source.id, source.score);
        }
    }

    Ok(())
}
