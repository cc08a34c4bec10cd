//! In-memory implementation of CollectionStore for testing and development

use crate::core::error::StorageError;
use crate::core::service::CollectionStore;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory collection
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same underlying collection.
#[derive(Clone)]
pub struct InMemoryCollection<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T> InMemoryCollection<T> {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a collection seeded with `records`
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StorageError> {
        let records = self.records.read().map_err(|e| StorageError::Unavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl<T> Default for InMemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> CollectionStore<T> for InMemoryCollection<T>
where
    T: Clone + Send + Sync,
{
    async fn load(&self) -> Result<Vec<T>, StorageError> {
        let records = self.records.read().map_err(|e| StorageError::Unavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(records.clone())
    }

    async fn save(&self, records: &[T]) -> Result<(), StorageError> {
        let mut stored = self.records.write().map_err(|e| StorageError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;

        *stored = records.to_vec();
        Ok(())
    }
}
