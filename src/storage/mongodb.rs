//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDataService<T>` backed by a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! MongoDB uses a **collection-per-record-type** pattern. Each
//! `MongoDataService<T>` operates on a collection named after
//! `T::resource_name()` (e.g., "donations", "members").
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs and most values are stored as
//! strings; `created_at` and `updated_at` become BSON dates (millisecond
//! precision) so that sorting is chronological. The `id` field is mapped to
//! MongoDB's `_id` convention.

use crate::core::error::StorageError;
use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use uuid::Uuid;

const DUPLICATE_KEY: i32 = 11000;

/// Record timestamps stored as BSON dates
const TIMESTAMP_FIELDS: &[&str] = &["created_at", "updated_at"];

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    for field in TIMESTAMP_FIELDS {
        if let Some(Bson::String(text)) = doc.get(*field) {
            let at = DateTime::parse_from_rfc3339(text)
                .map_err(|e| anyhow!("Invalid timestamp in '{}': {}", field, e))?;
            let date = mongodb::bson::DateTime::from_millis(at.timestamp_millis());
            doc.insert(*field, Bson::DateTime(date));
        }
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id`.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    for field in TIMESTAMP_FIELDS {
        if let Some(Bson::DateTime(date)) = doc.get(*field)
            && let Some(at) = DateTime::<Utc>::from_timestamp_millis(date.timestamp_millis())
        {
            doc.insert(*field, at.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY,
        _ => err.to_string().contains("E11000"),
    }
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic record storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use portal::storage::MongoDataService;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let db = client.database("ngo_portal");
/// let donations = MongoDataService::<Donation>::new(db);
/// donations.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    /// Create a new `MongoDataService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Entity> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize record: {}", e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize record from document: {}", e))
    }

    /// Create a unique index for each of `T::unique_fields()` plus a
    /// descending `created_at` index for listing.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let mut indexes = vec![IndexModel::builder().keys(doc! { "created_at": -1 }).build()];
        for field in T::unique_fields() {
            let key: &str = field;
            indexes.push(
                IndexModel::builder()
                    .keys(doc! { key: 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            );
        }

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to create indexes on {} collection: {}",
                    T::resource_name(),
                    e
                )
            })?;

        Ok(())
    }

    /// Name the unique field that a duplicate-key error most likely refers to
    fn duplicate_error(entity: &T, err: &mongodb::error::Error) -> anyhow::Error {
        let message = err.to_string();
        let field = T::unique_fields()
            .iter()
            .find(|field| message.contains(*field))
            .or_else(|| T::unique_fields().first())
            .copied()
            .unwrap_or("id");

        StorageError::Duplicate {
            entity_type: T::resource_name_singular().to_string(),
            field: field.to_string(),
            value: entity.field_value(field).unwrap_or_default(),
        }
        .into()
    }

    fn not_found(id: &Uuid) -> anyhow::Error {
        StorageError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            id: id.to_string(),
        }
        .into()
    }

    fn query_error(context: &str, err: mongodb::error::Error) -> anyhow::Error {
        StorageError::QueryError {
            backend: "mongodb".to_string(),
            message: format!("{}: {}", context, err),
        }
        .into()
    }

    async fn collect(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| Self::query_error("Failed to query records", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| Self::query_error("Failed to collect records", e))?;

        docs.into_iter().map(Self::document_to_entity).collect()
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for MongoDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        self.collection().insert_one(doc).await.map_err(|e| {
            if is_duplicate_key(&e) {
                Self::duplicate_error(&entity, &e)
            } else {
                Self::query_error("Failed to create record", e)
            }
        })?;

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| Self::query_error("Failed to get record", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_entity(d)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.collect(doc! {}).await
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id) }, doc)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    Self::duplicate_error(&entity, &e)
                } else {
                    Self::query_error("Failed to update record", e)
                }
            })?;

        if result.matched_count == 0 {
            return Err(Self::not_found(id));
        }

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| Self::query_error("Failed to delete record", e))?;

        if result.deleted_count == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }

    /// Values are stored with native BSON types, so booleans and numbers are
    /// matched in both string and native form.
    async fn find_by(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let field = if field == "id" { "_id" } else { field };
        let mut variants: Vec<Bson> = vec![Bson::String(value.to_string())];

        match value {
            "true" => variants.push(Bson::Boolean(true)),
            "false" => variants.push(Bson::Boolean(false)),
            _ => {
                if let Ok(i) = value.parse::<i64>() {
                    variants.push(Bson::Int64(i));
                }
                if let Ok(f) = value.parse::<f64>() {
                    variants.push(Bson::Double(f));
                }
            }
        }

        self.collect(doc! { field: { "$in": variants } }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_to_document_renames_id() {
        let json = serde_json::json!({ "id": "abc", "name": "x" });
        let doc = json_to_document(json).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), "abc");
        assert!(doc.get("id").is_none());
    }

    #[test]
    fn test_document_to_json_renames_id() {
        let json = document_to_json(doc! { "_id": "abc", "amount": 10.5 });
        assert_eq!(json["id"], "abc");
        assert_eq!(json["amount"], 10.5);
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_timestamps_are_stored_as_dates() {
        let json = serde_json::json!({
            "id": "abc",
            "created_at": "2024-03-01T10:00:00.500Z",
            "updated_at": "2024-03-01T10:00:00Z",
        });
        let doc = json_to_document(json).unwrap();

        let created = doc.get_datetime("created_at").unwrap();
        let updated = doc.get_datetime("updated_at").unwrap();
        assert!(created > updated);

        let back = document_to_json(doc);
        assert_eq!(back["created_at"], "2024-03-01T10:00:00.500Z");
        assert_eq!(back["updated_at"], "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let json = serde_json::json!({ "id": "abc", "created_at": "yesterday" });
        assert!(json_to_document(json).is_err());
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(json_to_document(serde_json::json!([1, 2])).is_err());
    }
}
