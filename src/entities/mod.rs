//! Records managed by the portal
//!
//! Each record type comes with the payloads accepted when creating and
//! updating it, and implements [`Record`] to turn those payloads into stored
//! values.

pub mod macros;

pub mod donation;
pub mod event;
pub mod gallery;
pub mod member;
pub mod post;
pub mod setting;
pub mod volunteer;

pub use donation::{Donation, DonationStatus, DonationUpdate, NewDonation, PaymentMethod};
pub use event::{Event, EventStatus, EventUpdate, NewEvent};
pub use gallery::{GalleryItem, GalleryItemUpdate, NewGalleryItem};
pub use member::{Member, MemberStatus, MemberUpdate, MembershipType, NewMember};
pub use post::{NewPost, Post, PostUpdate};
pub use setting::Setting;
pub use volunteer::{NewVolunteer, Volunteer, VolunteerStatus, VolunteerUpdate};

use crate::config::ReceiptConfig;
use crate::core::Entity;
use crate::core::error::PortalResult;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// Everything a record needs from the request when it is first created
#[derive(Debug, Clone)]
pub struct CreateContext {
    /// Id assigned to the new record
    pub id: Uuid,

    /// Creation time, used for `created_at`/`updated_at` and identifiers
    pub now: DateTime<Utc>,

    /// Whether the caller holds an admin role; public forms cannot set
    /// workflow fields such as `status`
    pub is_admin: bool,

    pub receipt_prefix: String,
    pub membership_prefix: String,
}

impl CreateContext {
    pub fn new(receipts: &ReceiptConfig, is_admin: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            now: Utc::now(),
            is_admin,
            receipt_prefix: receipts.receipt_prefix.clone(),
            membership_prefix: receipts.membership_prefix.clone(),
        }
    }
}

/// A record that can be created from and updated by a request payload
pub trait Record: Entity {
    /// Body accepted on `POST`
    type Create: DeserializeOwned + Validate + Send + 'static;

    /// Body accepted on `PUT`; absent fields are left unchanged
    type Update: DeserializeOwned + Validate + Send + 'static;

    /// Build a new record from a validated payload
    fn from_create(input: Self::Create, ctx: &CreateContext) -> PortalResult<Self>;

    /// Merge a validated payload into this record
    fn apply_update(&mut self, input: Self::Update) -> PortalResult<()>;

    /// Whether anonymous callers may see this record
    fn publicly_visible(&self) -> bool {
        true
    }
}

/// First `len` hex digits of `id`, upper-cased
pub(crate) fn short_code(id: &Uuid, len: usize) -> String {
    id.simple().to_string()[..len.min(32)].to_uppercase()
}

/// Replace `target` when the update carries a value
pub(crate) fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Replace an optional field; an update of blank text clears it
pub(crate) fn merge_text(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *target = crate::core::validation::filters::trim_opt(Some(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_code() {
        let id = Uuid::parse_str("0a1b2c3d-4e5f-6789-abcd-ef0123456789").unwrap();
        assert_eq!(short_code(&id, 8), "0A1B2C3D");
        assert_eq!(short_code(&id, 6), "0A1B2C");
    }

    #[test]
    fn test_merge_helpers() {
        let mut name = "old".to_string();
        merge(&mut name, None);
        assert_eq!(name, "old");
        merge(&mut name, Some("new".to_string()));
        assert_eq!(name, "new");

        let mut note = Some("x".to_string());
        merge_text(&mut note, None);
        assert_eq!(note.as_deref(), Some("x"));
        merge_text(&mut note, Some("  ".to_string()));
        assert_eq!(note, None);
    }
}
