//! Docker infrastructure - Template generation and container health probing

mod probe;
mod templates;

pub use probe::ContainerProbe;
pub use templates::{
    compose_commands, compose_file, docker_commands, run_command, DEFAULT_COMPOSE_PATH,
};
