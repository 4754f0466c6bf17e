//! Settings domain - User settings, item cache records and JSON path helpers

mod entity;
mod json_path;

pub use entity::{CacheConfig, CacheItem, DockerConfig, Settings, DEFAULT_MODEL};
pub use json_path::{deep_merge, get_path, set_path};
