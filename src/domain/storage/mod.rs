//! Storage domain - Key-value persistence abstraction

mod repository;

pub use repository::{KeyValueStore, KeyValueStoreExt};

#[cfg(test)]
pub use repository::mock;
