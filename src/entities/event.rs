//! Events shown on the public site

use super::{CreateContext, Record, merge, merge_text};
use crate::core::entity::variant_name;
use crate::core::error::{PortalResult, ValidationError};
use crate::core::validation::{filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub status: EventStatus,
}

crate::impl_entity!(Event, "event", "events",
    unique: [],
    fields: {
        "title" => |e| Some(e.title.clone()),
        "status" => |e| variant_name(&e.status),
    }
);

fn check_schedule(
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match ends_at {
        Some(end) if end < starts_at => Err(ValidationError::FieldError {
            field: "ends_at".to_string(),
            message: "must not be before starts_at".to_string(),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewEvent {
    #[validate(length(max = 200), custom(function = "validators::not_blank"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 20000))]
    pub description: String,

    #[validate(length(max = 300), custom(function = "validators::not_blank"))]
    pub location: String,

    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,

    #[validate(custom(function = "validators::link"))]
    pub image_url: Option<String>,

    pub status: Option<EventStatus>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct EventUpdate {
    #[validate(length(max = 200), custom(function = "validators::not_blank"))]
    pub title: Option<String>,

    #[validate(length(max = 20000))]
    pub description: Option<String>,

    #[validate(length(max = 300), custom(function = "validators::not_blank"))]
    pub location: Option<String>,

    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,

    #[validate(custom(function = "validators::link"))]
    pub image_url: Option<String>,

    pub status: Option<EventStatus>,
}

impl Record for Event {
    type Create = NewEvent;
    type Update = EventUpdate;

    fn from_create(input: NewEvent, ctx: &CreateContext) -> PortalResult<Self> {
        check_schedule(input.starts_at, input.ends_at)?;

        Ok(Event {
            id: ctx.id,
            created_at: ctx.now,
            updated_at: ctx.now,
            title: filters::trim(&input.title),
            description: input.description.trim().to_string(),
            location: filters::trim(&input.location),
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            image_url: filters::trim_opt(input.image_url),
            status: input.status.unwrap_or_default(),
        })
    }

    fn apply_update(&mut self, input: EventUpdate) -> PortalResult<()> {
        let starts_at = input.starts_at.unwrap_or(self.starts_at);
        let ends_at = input.ends_at.or(self.ends_at);
        check_schedule(starts_at, ends_at)?;

        merge(&mut self.title, input.title.map(|v| filters::trim(&v)));
        merge(&mut self.description, input.description.map(|v| v.trim().to_string()));
        merge(&mut self.location, input.location.map(|v| filters::trim(&v)));
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        merge_text(&mut self.image_url, input.image_url);
        merge(&mut self.status, input.status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReceiptConfig;
    use chrono::Duration;

    fn form() -> NewEvent {
        NewEvent {
            title: "Blood Donation Camp".to_string(),
            description: "Annual camp".to_string(),
            location: "Community Hall".to_string(),
            starts_at: Utc::now() + Duration::days(7),
            ends_at: None,
            image_url: None,
            status: None,
        }
    }

    #[test]
    fn test_create_defaults_to_upcoming() {
        let ctx = CreateContext::new(&ReceiptConfig::default(), true);
        let event = Event::from_create(form(), &ctx).unwrap();
        assert_eq!(event.status, EventStatus::Upcoming);
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let ctx = CreateContext::new(&ReceiptConfig::default(), true);
        let mut input = form();
        input.ends_at = Some(input.starts_at - Duration::hours(1));
        assert!(Event::from_create(input, &ctx).is_err());

        let mut event = Event::from_create(form(), &ctx).unwrap();
        let err = event.apply_update(EventUpdate {
            ends_at: Some(event.starts_at - Duration::minutes(5)),
            ..Default::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_blank_title_fails_validation() {
        let mut input = form();
        input.title = "   ".to_string();
        assert!(input.validate().is_err());
    }
}
