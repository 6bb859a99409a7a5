//! In-memory implementation of DataService for development and tests

use crate::core::error::StorageError;
use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Uses RwLock for thread-safe access. The lock is never held across an
/// await point. Unique fields are enforced by scanning the map.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new, empty in-memory data service
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fail with `Duplicate` if another record already holds one of the
/// candidate's unique values
fn check_unique<T: Entity>(records: &HashMap<Uuid, T>, candidate: &T) -> Result<()> {
    for field in T::unique_fields() {
        let Some(value) = candidate.field_value(field) else {
            continue;
        };
        let taken = records
            .values()
            .any(|other| other.id() != candidate.id() && other.matches(field, &value));
        if taken {
            return Err(StorageError::Duplicate {
                entity_type: T::resource_name_singular().to_string(),
                field: field.to_string(),
                value,
            }
            .into());
        }
    }
    Ok(())
}

fn newest_first<T: Entity>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    items
}

fn not_found<T: Entity>(id: &Uuid) -> anyhow::Error {
    StorageError::NotFound {
        entity_type: T::resource_name_singular().to_string(),
        id: id.to_string(),
    }
    .into()
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        check_unique(&records, &entity)?;
        records.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(newest_first(records.values().cloned().collect()))
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if !records.contains_key(id) {
            return Err(not_found::<T>(id));
        }
        if entity.id() != *id {
            return Err(anyhow!(
                "Record id {} does not match path id {}",
                entity.id(),
                id
            ));
        }

        check_unique(&records, &entity)?;
        records.insert(*id, entity.clone());

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.remove(id).ok_or_else(|| not_found::<T>(id))?;

        Ok(())
    }

    async fn find_by(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(newest_first(
            records
                .values()
                .filter(|record| record.matches(field, value))
                .cloned()
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StorageError;
    use chrono::{DateTime, Duration, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Contact {
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        email: String,
        city: String,
    }

    crate::impl_entity!(Contact, "contact", "contacts",
        unique: ["email"],
        fields: {
            "email" => |c| Some(c.email.clone()),
            "city" => |c| Some(c.city.clone()),
        }
    );

    fn contact(email: &str, city: &str) -> Contact {
        let now = Utc::now();
        Contact {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = InMemoryDataService::new();
        let c = service.create(contact("a@ngo.org", "Pune")).await.unwrap();

        let fetched = service.get(&c.id).await.unwrap();
        assert_eq!(fetched.unwrap().email, "a@ngo.org");
        assert!(service.get(&Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_unique_field_is_rejected() {
        let service = InMemoryDataService::new();
        service.create(contact("a@ngo.org", "Pune")).await.unwrap();

        let err = service
            .create(contact("a@ngo.org", "Delhi"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::Duplicate { field, .. }) if field == "email"
        ));
    }

    #[tokio::test]
    async fn test_update_may_keep_its_own_unique_value() {
        let service = InMemoryDataService::new();
        let mut c = service.create(contact("a@ngo.org", "Pune")).await.unwrap();

        c.city = "Nagpur".to_string();
        let updated = service.update(&c.id, c.clone()).await.unwrap();
        assert_eq!(updated.city, "Nagpur");
    }

    #[tokio::test]
    async fn test_update_into_taken_value_conflicts() {
        let service = InMemoryDataService::new();
        service.create(contact("a@ngo.org", "Pune")).await.unwrap();
        let mut b = service.create(contact("b@ngo.org", "Pune")).await.unwrap();

        b.email = "a@ngo.org".to_string();
        let err = service.update(&b.id, b.clone()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_is_not_found() {
        let service = InMemoryDataService::<Contact>::new();
        let c = contact("x@ngo.org", "Goa");

        let err = service.update(&c.id, c.clone()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::NotFound { .. })
        ));

        let err = service.delete(&c.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let service = InMemoryDataService::new();
        let mut old = contact("old@ngo.org", "Pune");
        old.created_at = Utc::now() - Duration::days(2);
        let old = service.create(old).await.unwrap();
        let new = service.create(contact("new@ngo.org", "Pune")).await.unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, new.id);
        assert_eq!(all[1].id, old.id);
    }

    #[tokio::test]
    async fn test_find_by_and_delete() {
        let service = InMemoryDataService::new();
        let a = service.create(contact("a@ngo.org", "Pune")).await.unwrap();
        service.create(contact("b@ngo.org", "Delhi")).await.unwrap();

        let pune = service.find_by("city", "Pune").await.unwrap();
        assert_eq!(pune.len(), 1);

        service.delete(&a.id).await.unwrap();
        assert!(service.find_by("city", "Pune").await.unwrap().is_empty());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
