//! Donations and their receipt numbers

use super::{CreateContext, Record, merge, merge_text, short_code};
use crate::core::entity::variant_name;
use crate::core::error::PortalResult;
use crate::core::validation::{filters, validators};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    BankTransfer,
    Cheque,
    #[default]
    Online,
}

impl PaymentMethod {
    /// Label printed on receipts
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Cheque => "Cheque",
            PaymentMethod::Online => "Online",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub donor_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub pan_number: Option<String>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub purpose: Option<String>,
    pub receipt_number: String,
    pub status: DonationStatus,
    pub notes: Option<String>,
}

crate::impl_entity!(Donation, "donation", "donations",
    unique: ["receipt_number"],
    fields: {
        "receipt_number" => |d| Some(d.receipt_number.clone()),
        "email" => |d| Some(d.email.clone()),
        "status" => |d| variant_name(&d.status),
        "payment_method" => |d| variant_name(&d.payment_method),
    }
);

/// `{prefix}-{YYYYMMDD}-{8 upper hex}`
pub fn receipt_number(prefix: &str, at: DateTime<Utc>, id: &Uuid) -> String {
    format!("{}-{}-{}", prefix, at.format("%Y%m%d"), short_code(id, 8))
}

/// Donation form payload
#[derive(Debug, Deserialize, Validate)]
pub struct NewDonation {
    #[validate(
        length(max = 120),
        custom(function = "validators::not_blank")
    )]
    pub donor_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validators::phone"))]
    pub phone: String,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(custom(function = "validators::pan_number"))]
    pub pan_number: Option<String>,

    #[validate(range(exclusive_min = 0.0, max = 1_000_000_000_000.0))]
    pub amount: f64,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,

    #[validate(length(max = 200))]
    pub purpose: Option<String>,

    /// Honoured for admins only
    pub status: Option<DonationStatus>,

    /// Honoured for admins only
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Admin changes to a donation; the receipt number never changes
#[derive(Debug, Default, Deserialize, Validate)]
pub struct DonationUpdate {
    #[validate(
        length(max = 120),
        custom(function = "validators::not_blank")
    )]
    pub donor_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom(function = "validators::phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(custom(function = "validators::pan_number"))]
    pub pan_number: Option<String>,

    #[validate(range(exclusive_min = 0.0, max = 1_000_000_000_000.0))]
    pub amount: Option<f64>,

    pub payment_method: Option<PaymentMethod>,

    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,

    #[validate(length(max = 200))]
    pub purpose: Option<String>,

    pub status: Option<DonationStatus>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl Record for Donation {
    type Create = NewDonation;
    type Update = DonationUpdate;

    fn from_create(input: NewDonation, ctx: &CreateContext) -> PortalResult<Self> {
        let (status, notes) = if ctx.is_admin {
            (input.status.unwrap_or_default(), filters::trim_opt(input.notes))
        } else {
            (DonationStatus::Pending, None)
        };

        Ok(Donation {
            id: ctx.id,
            created_at: ctx.now,
            updated_at: ctx.now,
            donor_name: filters::trim(&input.donor_name),
            email: filters::email(&input.email),
            phone: filters::trim(&input.phone),
            address: filters::trim_opt(input.address),
            pan_number: filters::trim_opt(input.pan_number).map(|p| filters::uppercase(&p)),
            amount: input.amount,
            payment_method: input.payment_method,
            transaction_id: filters::trim_opt(input.transaction_id),
            purpose: filters::trim_opt(input.purpose),
            receipt_number: receipt_number(&ctx.receipt_prefix, ctx.now, &ctx.id),
            status,
            notes,
        })
    }

    fn apply_update(&mut self, input: DonationUpdate) -> PortalResult<()> {
        merge(&mut self.donor_name, input.donor_name.map(|v| filters::trim(&v)));
        merge(&mut self.email, input.email.map(|v| filters::email(&v)));
        merge(&mut self.phone, input.phone.map(|v| filters::trim(&v)));
        merge_text(&mut self.address, input.address);
        merge_text(&mut self.pan_number, input.pan_number.map(|v| filters::uppercase(&v)));
        merge(&mut self.amount, input.amount);
        merge(&mut self.payment_method, input.payment_method);
        merge_text(&mut self.transaction_id, input.transaction_id);
        merge_text(&mut self.purpose, input.purpose);
        merge(&mut self.status, input.status);
        merge_text(&mut self.notes, input.notes);
        Ok(())
    }
}
