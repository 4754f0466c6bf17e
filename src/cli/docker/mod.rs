//! Docker command - prints templates and probes the local n8n container

use std::time::Duration;

use clap::{Args, Subcommand};

use crate::domain::DockerOptions;
use crate::infrastructure::docker::{
    compose_commands, compose_file, docker_commands, run_command, ContainerProbe,
};
use crate::App;

use super::print_json;

#[derive(Args)]
pub struct DockerArgs {
    #[command(subcommand)]
    pub command: DockerCommand,

    #[command(flatten)]
    pub options: DockerOverrides,
}

/// Overrides for the stored docker configuration
#[derive(Args, Default)]
pub struct DockerOverrides {
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, global = true)]
    pub protocol: Option<String>,

    #[arg(long, global = true)]
    pub data_path: Option<String>,
}

impl DockerOverrides {
    fn apply(&self, mut options: DockerOptions) -> DockerOptions {
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(ref host) = self.host {
            options.host = host.clone();
        }
        if let Some(ref protocol) = self.protocol {
            options.protocol = protocol.clone();
        }
        if let Some(ref data_path) = self.data_path {
            options.data_path = data_path.clone();
        }
        options
    }
}

#[derive(Subcommand)]
pub enum DockerCommand {
    /// Print a docker-compose file
    Compose,

    /// Print the equivalent `docker run` command
    Run,

    /// Print container lifecycle commands
    Commands {
        /// Compose file used by the compose variants
        #[arg(long)]
        compose_path: Option<String>,
    },

    /// Check whether the container answers its health endpoint
    Status {
        #[arg(long, default_value_t = 5)]
        timeout_secs: u64,
    },
}

pub async fn run(app: &App, args: DockerArgs) -> anyhow::Result<()> {
    let options = args.options.apply(app.docker.clone());

    match args.command {
        DockerCommand::Compose => {
            print!("{}", compose_file(&options));
            Ok(())
        }
        DockerCommand::Run => {
            println!("{}", run_command(&options));
            Ok(())
        }
        DockerCommand::Commands { compose_path } => print_json(&serde_json::json!({
            "docker": docker_commands(),
            "compose": compose_commands(compose_path.as_deref()),
        })),
        DockerCommand::Status { timeout_secs } => {
            let probe = ContainerProbe::new(Duration::from_secs(timeout_secs))?;
            print_json(&probe.status(&options).await)
        }
    }
}
