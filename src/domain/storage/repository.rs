//! Key-value store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Persistent key-value store holding JSON values under string keys
///
/// Values are whole records: writers replace the value stored under a key,
/// there is no partial update.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Reads the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError>;

    /// Replaces the value stored under `key`
    async fn set(&self, key: &str, value: Value) -> Result<(), DomainError>;

    /// Removes a key, returns true if it was present
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;

    /// Lists all keys currently stored
    async fn keys(&self) -> Result<Vec<String>, DomainError>;

    /// Checks if a key is present
    async fn contains(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Extension trait providing typed get/set operations
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and deserializes the value stored under `key`
    fn get_typed<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get(key).await? {
                Some(value) => {
                    let typed = serde_json::from_value(value).map_err(|e| {
                        DomainError::storage(format!(
                            "Failed to deserialize value for key '{}': {}",
                            key, e
                        ))
                    })?;
                    Ok(Some(typed))
                }
                None => Ok(None),
            }
        }
    }

    /// Serializes and stores `value` under `key`
    fn set_typed<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let json = serde_json::to_value(value).map_err(|e| {
                DomainError::storage(format!("Failed to serialize value for key '{}': {}", key, e))
            })?;
            self.set(key, json).await
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock store for testing, with separately switchable read and write failures
    #[derive(Debug, Default)]
    pub struct MockKeyValueStore {
        entries: Mutex<HashMap<String, Value>>,
        read_error: Mutex<Option<String>>,
        write_error: Mutex<Option<String>>,
        writes: Mutex<usize>,
    }

    impl MockKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: impl Into<String>, value: Value) -> Self {
            self.entries.lock().unwrap().insert(key.into(), value);
            self
        }

        pub fn with_read_error(self, error: impl Into<String>) -> Self {
            *self.read_error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn with_write_error(self, error: impl Into<String>) -> Self {
            *self.write_error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn fail_writes(&self, error: impl Into<String>) {
            *self.write_error.lock().unwrap() = Some(error.into());
        }

        pub fn write_count(&self) -> usize {
            *self.writes.lock().unwrap()
        }

        pub fn snapshot(&self, key: &str) -> Option<Value> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn check_read(&self) -> Result<(), DomainError> {
            if let Some(error) = self.read_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }

        fn check_write(&self) -> Result<(), DomainError> {
            *self.writes.lock().unwrap() += 1;
            if let Some(error) = self.write_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl KeyValueStore for MockKeyValueStore {
        async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
            self.check_read()?;
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), DomainError> {
            self.check_write()?;
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<bool, DomainError> {
            self.check_write()?;
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }

        async fn keys(&self) -> Result<Vec<String>, DomainError> {
            self.check_read()?;
            Ok(self.entries.lock().unwrap().keys().cloned().collect())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde::Deserialize;

        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Theme {
            name: String,
            dark: bool,
        }

        #[tokio::test]
        async fn test_typed_round_trip() {
            let store = MockKeyValueStore::new();
            let theme = Theme {
                name: "light".to_string(),
                dark: false,
            };

            store.set_typed("theme", &theme).await.unwrap();
            let loaded: Option<Theme> = store.get_typed("theme").await.unwrap();

            assert_eq!(loaded, Some(theme));
        }

        #[tokio::test]
        async fn test_typed_get_wrong_shape() {
            let store = MockKeyValueStore::new().with_entry("theme", serde_json::json!(42));

            let result: Result<Option<Theme>, _> = store.get_typed("theme").await;

            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }

        #[tokio::test]
        async fn test_contains_default_impl() {
            let store = MockKeyValueStore::new().with_entry("a", serde_json::json!(1));

            assert!(store.contains("a").await.unwrap());
            assert!(!store.contains("b").await.unwrap());
        }

        #[tokio::test]
        async fn test_read_and_write_errors_are_independent() {
            let store = MockKeyValueStore::new().with_write_error("read-only");

            assert!(store.get("a").await.unwrap().is_none());
            assert!(store.set("a", serde_json::json!(1)).await.is_err());
            assert_eq!(store.write_count(), 1);
        }
    }
}
