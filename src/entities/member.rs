//! Members and membership ids

use super::{CreateContext, Record, merge, merge_text, short_code};
use crate::core::entity::variant_name;
use crate::core::error::{PortalResult, ValidationError};
use crate::core::validation::{filters, validators};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    #[default]
    General,
    Life,
    Honorary,
    Patron,
}

impl MembershipType {
    pub fn label(&self) -> &'static str {
        match self {
            MembershipType::General => "General Member",
            MembershipType::Life => "Life Member",
            MembershipType::Honorary => "Honorary Member",
            MembershipType::Patron => "Patron",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub membership_type: MembershipType,
    pub membership_id: String,
    pub status: MemberStatus,
    pub joined_on: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub photo_url: Option<String>,
}

crate::impl_entity!(Member, "member", "members",
    unique: ["membership_id", "email"],
    fields: {
        "membership_id" => |m| Some(m.membership_id.clone()),
        "email" => |m| Some(m.email.clone()),
        "status" => |m| variant_name(&m.status),
        "membership_type" => |m| variant_name(&m.membership_type),
    }
);

/// `{prefix}-{YYYY}-{6 upper hex}`
pub fn membership_id(prefix: &str, at: DateTime<Utc>, id: &Uuid) -> String {
    format!("{}-{}-{}", prefix, at.year(), short_code(id, 6))
}

impl Member {
    /// Validity line for the ID card
    pub fn validity(&self) -> String {
        match self.valid_until {
            Some(date) => date.format("%d %b %Y").to_string(),
            None if self.membership_type == MembershipType::Life => "Lifetime".to_string(),
            None => "-".to_string(),
        }
    }
}

fn check_dates(joined_on: NaiveDate, valid_until: Option<NaiveDate>) -> Result<(), ValidationError> {
    match valid_until {
        Some(until) if until < joined_on => Err(ValidationError::FieldError {
            field: "valid_until".to_string(),
            message: "must not be before joined_on".to_string(),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewMember {
    #[validate(length(max = 120), custom(function = "validators::not_blank"))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validators::phone"))]
    pub phone: String,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[serde(default)]
    pub membership_type: MembershipType,

    pub status: Option<MemberStatus>,

    /// Defaults to the creation date
    pub joined_on: Option<NaiveDate>,

    pub valid_until: Option<NaiveDate>,

    #[validate(custom(function = "validators::link"))]
    pub photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct MemberUpdate {
    #[validate(length(max = 120), custom(function = "validators::not_blank"))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom(function = "validators::phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    pub membership_type: Option<MembershipType>,
    pub status: Option<MemberStatus>,
    pub joined_on: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,

    #[validate(custom(function = "validators::link"))]
    pub photo_url: Option<String>,
}

impl Record for Member {
    type Create = NewMember;
    type Update = MemberUpdate;

    fn from_create(input: NewMember, ctx: &CreateContext) -> PortalResult<Self> {
        let joined_on = input.joined_on.unwrap_or_else(|| ctx.now.date_naive());
        check_dates(joined_on, input.valid_until)?;

        Ok(Member {
            id: ctx.id,
            created_at: ctx.now,
            updated_at: ctx.now,
            name: filters::trim(&input.name),
            email: filters::email(&input.email),
            phone: filters::trim(&input.phone),
            address: filters::trim_opt(input.address),
            membership_type: input.membership_type,
            membership_id: membership_id(&ctx.membership_prefix, ctx.now, &ctx.id),
            status: input.status.unwrap_or_default(),
            joined_on,
            valid_until: input.valid_until,
            photo_url: filters::trim_opt(input.photo_url),
        })
    }

    fn apply_update(&mut self, input: MemberUpdate) -> PortalResult<()> {
        let joined_on = input.joined_on.unwrap_or(self.joined_on);
        let valid_until = input.valid_until.or(self.valid_until);
        check_dates(joined_on, valid_until)?;

        merge(&mut self.name, input.name.map(|v| filters::trim(&v)));
        merge(&mut self.email, input.email.map(|v| filters::email(&v)));
        merge(&mut self.phone, input.phone.map(|v| filters::trim(&v)));
        merge_text(&mut self.address, input.address);
        merge(&mut self.membership_type, input.membership_type);
        merge(&mut self.status, input.status);
        self.joined_on = joined_on;
        self.valid_until = valid_until;
        merge_text(&mut self.photo_url, input.photo_url);
        Ok(())
    }
}
