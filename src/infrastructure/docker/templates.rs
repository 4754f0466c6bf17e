//! Text templates for running n8n under Docker
//!
//! Nothing here touches a Docker daemon; the output is meant to be pasted
//! into a shell or saved as a compose file.

use crate::domain::docker::{
    ComposeCommands, DockerCommands, DockerOptions, CONTAINER_NAME, N8N_IMAGE,
};

pub const DEFAULT_COMPOSE_PATH: &str = "./docker-compose.yml";

/// Environment passed to the container, in template order
fn environment(options: &DockerOptions) -> Vec<(&'static str, String)> {
    vec![
        ("N8N_HOST", options.host.clone()),
        ("N8N_PORT", "5678".to_string()),
        ("N8N_PROTOCOL", options.protocol.clone()),
        ("NODE_ENV", "production".to_string()),
        ("N8N_ENCRYPTION_KEY", options.encryption_key.clone()),
        ("WEBHOOK_URL", options.webhook_url()),
        ("GENERIC_TIMEZONE", options.timezone.clone()),
        ("TZ", options.timezone.clone()),
    ]
}

/// docker-compose YAML for a single n8n service
pub fn compose_file(options: &DockerOptions) -> String {
    let mut yaml = format!(
        concat!(
            "version: '3'\n\n",
            "services:\n",
            "  n8n:\n",
            "    container_name: {}\n",
            "    image: {}\n",
            "    restart: always\n",
            "    ports:\n",
            "      - \"{}:5678\"\n",
            "    environment:\n",
        ),
        CONTAINER_NAME, N8N_IMAGE, options.port
    );

    for (name, value) in environment(options) {
        yaml.push_str(&format!("      - {}={}\n", name, value));
    }

    yaml.push_str(&format!(
        "    volumes:\n      - {}:/home/node/.n8n\n",
        options.data_path
    ));
    yaml
}

/// Multi-line `docker run` equivalent of [`compose_file`]
pub fn run_command(options: &DockerOptions) -> String {
    let mut lines = vec![
        "docker run -d".to_string(),
        format!("  --name {}", CONTAINER_NAME),
        format!("  -p {}:5678", options.port),
    ];

    lines.extend(
        environment(options)
            .into_iter()
            .map(|(name, value)| format!("  -e {}={}", name, value)),
    );
    lines.push(format!("  -v {}:/home/node/.n8n", options.data_path));
    lines.push(format!("  {}", N8N_IMAGE));

    lines.join(" \\\n")
}

pub fn docker_commands() -> DockerCommands {
    DockerCommands {
        start: format!("docker start {}", CONTAINER_NAME),
        stop: format!("docker stop {}", CONTAINER_NAME),
        restart: format!("docker restart {}", CONTAINER_NAME),
        logs: format!("docker logs {}", CONTAINER_NAME),
        remove: format!("docker rm -f {}", CONTAINER_NAME),
    }
}

/// Compose lifecycle commands; `path` defaults to [`DEFAULT_COMPOSE_PATH`]
pub fn compose_commands(path: Option<&str>) -> ComposeCommands {
    let path = path.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_COMPOSE_PATH);

    ComposeCommands {
        up: format!("docker-compose -f {} up -d", path),
        down: format!("docker-compose -f {} down", path),
        restart: format!("docker-compose -f {} restart", path),
        logs: format!("docker-compose -f {} logs", path),
        pull: format!("docker-compose -f {} pull", path),
    }
}
