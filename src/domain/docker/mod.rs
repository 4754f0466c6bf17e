//! Docker domain - Options and status of the local n8n container

mod entity;

pub use entity::{
    ComposeCommands, ContainerState, ContainerStatus, DockerCommands, DockerOptions,
    CONTAINER_NAME, DEFAULT_ENCRYPTION_KEY, DEFAULT_TIMEZONE, N8N_IMAGE,
};
