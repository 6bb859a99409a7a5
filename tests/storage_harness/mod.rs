//! Shared test harness for storage backend testing
//!
//! Provides `TestNote`, a small record with a unique `email`, a string
//! `status` and a boolean `pinned` flag, plus helpers for building notes.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestNote {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub email: String,
    pub status: String,
    pub pinned: bool,
}

portal::impl_entity!(TestNote, "test note", "test_notes",
    unique: ["email"],
    fields: {
        "email" => |n| Some(n.email.clone()),
        "status" => |n| Some(n.status.clone()),
        "pinned" => |n| Some(n.pinned.to_string()),
    }
);

/// A fresh note created "now"
pub fn create_test_note(title: &str, email: &str, status: &str, pinned: bool) -> TestNote {
    let now = Utc::now();
    TestNote {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        title: title.to_string(),
        email: email.to_string(),
        status: status.to_string(),
        pinned,
    }
}

/// A note created `minutes` minutes ago
pub fn create_aged_note(title: &str, minutes: i64) -> TestNote {
    let mut note = create_test_note(
        title,
        &format!("{}@test.org", title.to_lowercase()),
        "draft",
        false,
    );
    note.created_at = Utc::now() - Duration::minutes(minutes);
    note.updated_at = note.created_at;
    note
}
