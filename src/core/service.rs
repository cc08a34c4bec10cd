//! Service traits for durable collections

use crate::core::error::StorageError;
use async_trait::async_trait;

/// Durable storage for a whole collection of records
///
/// The collection is the unit of durability: callers load everything, change
/// it in memory and save everything back. Implementations must make `save`
/// all-or-nothing, so a concurrent or later `load` observes either the old
/// or the new collection and never a partial one.
#[async_trait]
pub trait CollectionStore<T: Send + Sync>: Send + Sync {
    /// Load the full collection, in insertion order
    ///
    /// A store that has never been written yields an empty collection.
    async fn load(&self) -> Result<Vec<T>, StorageError>;

    /// Replace the full collection
    async fn save(&self, records: &[T]) -> Result<(), StorageError>;
}
