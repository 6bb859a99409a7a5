//! Service trait for record storage

use crate::core::Entity;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing stored records
///
/// Implementations provide CRUD operations for a specific record type.
/// Handlers are agnostic to the underlying storage mechanism.
///
/// Errors are `anyhow` errors; lookups on a missing id and uniqueness
/// violations carry a [`StorageError`](crate::core::error::StorageError)
/// inside so they surface as 404 and 409.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Create a new record
    async fn create(&self, entity: T) -> Result<T>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all records, newest first
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing record
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete a record
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Records whose `field` equals `value`, newest first
    async fn find_by(&self, field: &str, value: &str) -> Result<Vec<T>>;
}
