//! Site settings: a key → JSON value map stored one record per key

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub key: String,
    pub value: Value,
}

crate::impl_entity!(Setting, "setting", "settings",
    unique: ["key"],
    fields: {
        "key" => |s| Some(s.key.clone()),
    }
);

impl Setting {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            key: key.into(),
            value,
        }
    }
}

/// Body of `PUT /api/settings/{key}`
#[derive(Debug, Deserialize, Validate)]
pub struct SettingValue {
    pub value: Value,
}
