use clap::Parser;
use n8n_assistant::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = cli::bootstrap().await?;

    match cli.command {
        Command::Kb(args) => cli::kb::run(&app, args).await,
        Command::Ask(args) => cli::ask::run(&app, args).await,
        Command::Workflow(args) => cli::workflow::run(&app, args).await,
        Command::Docker(args) => cli::docker::run(&app, args).await,
        Command::Settings(args) => cli::settings::run(&app, args).await,
    }
}
