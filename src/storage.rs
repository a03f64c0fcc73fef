//! Key-value persistence seam.
//!
//! The new-tab page stores its records in the extension's storage area, which
//! the rest of the application sees only through the [`KeyValueStore`] trait
//! defined here. Values are JSON documents addressed by string keys; the
//! backend is treated as durable with last-write-wins semantics.
//!
//! # Key Components
//! - [`KeyValueStore`]: the async trait a storage backend implements.
//! - [`InMemoryKeyValueStore`]: a map-backed implementation for tests and for
//!   host contexts without extension storage.
//! - [`StorageError`]: failure reported by a backend.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Error reported by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error during '{operation}': {message}")]
    Backend { operation: String, message: String },
}

impl StorageError {
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// String-keyed asynchronous key-value storage.
///
/// Implementors adapt a concrete backend (the extension storage area, a file,
/// a test double). Each call is independent; the trait carries no transaction
/// or batching semantics.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// A [`KeyValueStore`] holding its entries in memory.
///
/// Used in tests and in host contexts that have no extension storage area.
/// Contents do not survive the process.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let store = InMemoryKeyValueStore::new();
        store.set("greeting", "hello").await.unwrap();
        assert_eq!(
            store.get("greeting").await.unwrap(),
            Some("hello".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let store = InMemoryKeyValueStore::new();
        store.set("key", "first").await.unwrap();
        store.set("key", "second").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("second".to_string()));
    }
}
