// SPDX-License-Identifier: MPL-2.0
//! Blob store port definition.
//!
//! This module defines the [`BlobStore`] trait for the opaque key/value
//! store that holds persisted session snapshots. The only guarantee the
//! engine relies on is last-write-wins; there are no transactions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

// =============================================================================
// StoreError
// =============================================================================

/// Errors reported by a blob store implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the operation failed.
    Unavailable(String),

    /// The stored record exists but could not be read back.
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::Corrupt(msg) => write!(f, "stored record corrupt: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

// =============================================================================
// BlobStore Trait
// =============================================================================

/// Port for opaque blob persistence.
///
/// Implementations may be backed by browser storage, a file, a database,
/// anything with get/put/delete semantics. Persistence is best-effort:
/// callers log failures and continue.
pub trait BlobStore {
    /// Reads the blob stored under `key`, or `None` when absent.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    /// Writes `bytes` under `key`, replacing any previous value.
    fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Removes the blob stored under `key`. Removing an absent key is not
    /// an error.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

// =============================================================================
// InMemoryBlobStore
// =============================================================================

/// Reference [`BlobStore`] backed by a shared in-memory map.
///
/// Used in tests and by hosts that have no durable store available.
/// Cloning yields another handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Returns true when no blobs are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl BlobStore for InMemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.inner.lock().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.lock().await.remove(key);
        Ok(())
    }
}
