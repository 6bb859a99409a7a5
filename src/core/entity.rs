//! Entity trait shared by every stored record

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Base trait for all records kept in the document store.
///
/// Every record has:
/// - id: Unique identifier
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
///
/// Stores rely on [`Entity::unique_fields`] and [`Entity::field_value`] to
/// enforce uniqueness and answer `find_by` queries without knowing the
/// concrete type. Implement it with [`impl_entity!`](crate::impl_entity).
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The plural resource name, also used as the collection name
    fn resource_name() -> &'static str;

    /// The singular resource name used in error messages
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Bump `updated_at` to now
    fn touch(&mut self);

    /// Fields whose values must be unique across the collection
    fn unique_fields() -> &'static [&'static str];

    /// String form of a queryable field, `None` when unset or unknown
    fn field_value(&self, field: &str) -> Option<String>;

    /// Check whether this record holds `value` in `field`
    fn matches(&self, field: &str, value: &str) -> bool {
        self.field_value(field).as_deref() == Some(value)
    }
}

/// String form of a unit enum variant as it is serialized (snake_case)
pub fn variant_name<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}
