//! Volunteer sign-ups

use super::{CreateContext, Record, merge, merge_text};
use crate::core::entity::variant_name;
use crate::core::error::PortalResult;
use crate::core::validation::{filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolunteerStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub availability: Option<String>,
    pub message: Option<String>,
    pub status: VolunteerStatus,
}

crate::impl_entity!(Volunteer, "volunteer", "volunteers",
    unique: ["email"],
    fields: {
        "email" => |v| Some(v.email.clone()),
        "status" => |v| variant_name(&v.status),
    }
);

#[derive(Debug, Deserialize, Validate)]
pub struct NewVolunteer {
    #[validate(length(max = 120), custom(function = "validators::not_blank"))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validators::phone"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 30))]
    pub skills: Vec<String>,

    #[validate(length(max = 200))]
    pub availability: Option<String>,

    #[validate(length(max = 2000))]
    pub message: Option<String>,

    /// Honoured for admins only
    pub status: Option<VolunteerStatus>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct VolunteerUpdate {
    #[validate(length(max = 120), custom(function = "validators::not_blank"))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom(function = "validators::phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 30))]
    pub skills: Option<Vec<String>>,

    #[validate(length(max = 200))]
    pub availability: Option<String>,

    #[validate(length(max = 2000))]
    pub message: Option<String>,

    pub status: Option<VolunteerStatus>,
}

impl Record for Volunteer {
    type Create = NewVolunteer;
    type Update = VolunteerUpdate;

    fn from_create(input: NewVolunteer, ctx: &CreateContext) -> PortalResult<Self> {
        let status = match (ctx.is_admin, input.status) {
            (true, Some(status)) => status,
            _ => VolunteerStatus::Pending,
        };

        Ok(Volunteer {
            id: ctx.id,
            created_at: ctx.now,
            updated_at: ctx.now,
            name: filters::trim(&input.name),
            email: filters::email(&input.email),
            phone: filters::trim(&input.phone),
            skills: filters::tags(input.skills),
            availability: filters::trim_opt(input.availability),
            message: filters::trim_opt(input.message),
            status,
        })
    }

    fn apply_update(&mut self, input: VolunteerUpdate) -> PortalResult<()> {
        merge(&mut self.name, input.name.map(|v| filters::trim(&v)));
        merge(&mut self.email, input.email.map(|v| filters::email(&v)));
        merge(&mut self.phone, input.phone.map(|v| filters::trim(&v)));
        merge(&mut self.skills, input.skills.map(filters::tags));
        merge_text(&mut self.availability, input.availability);
        merge_text(&mut self.message, input.message);
        merge(&mut self.status, input.status);
        Ok(())
    }
}
