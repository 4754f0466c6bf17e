//! Settings command - shows and edits the stored settings record

use clap::{Args, Subcommand};
use serde_json::Value;

use crate::App;

use super::print_json;

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print every setting
    Show,

    /// Print one setting by dotted path, e.g. `dockerConfig.port`
    Get { path: String },

    /// Set one setting; the value is parsed as JSON, falling back to a string
    Set { path: String, value: String },
}

pub async fn run(app: &App, args: SettingsArgs) -> anyhow::Result<()> {
    match args.command {
        SettingsCommand::Show => print_json(&app.settings.get_settings().await?),
        SettingsCommand::Get { path } => match app.settings.get_setting(&path).await? {
            Some(value) => print_json(&value),
            None => anyhow::bail!("No setting at '{}'", path),
        },
        SettingsCommand::Set { path, value } => {
            let settings = app.settings.set_setting(&path, parse_value(&value)).await?;
            print_json(&settings)
        }
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
