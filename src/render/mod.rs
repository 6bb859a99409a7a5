//! PDF documents produced by the portal
//!
//! - [`receipt`]: donation receipts (A4)
//! - [`id_card`]: member ID cards (credit-card size, with QR code)
//! - [`words`]: amounts in figures and in words
//!
//! Rendering is pure: the same record and organisation profile always yield
//! the same bytes.

pub mod id_card;
pub mod pdf;
pub mod receipt;
pub mod words;

use serde::{Deserialize, Serialize};

pub use id_card::render_id_card;
pub use receipt::render_receipt;
pub use words::{amount_in_words, amount_to_words, format_amount};

/// Errors raised while producing a PDF
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("QR code generation failed: {0}")]
    QrCode(String),

    #[error("PDF encoding failed: {0}")]
    Encoding(String),

    #[error("Renderer produced no output")]
    EmptyOutput,
}

/// Organisation details printed on receipts and ID cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationProfile {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub registration_number: Option<String>,
    pub pan: Option<String>,

    /// Tax exemption note printed in the receipt footer (80G)
    pub tax_exemption_note: Option<String>,

    /// Name or title printed under the signature line
    pub signatory: String,
}

impl Default for OrganizationProfile {
    fn default() -> Self {
        Self {
            name: "NGO Portal Foundation".to_string(),
            address: String::new(),
            phone: None,
            email: None,
            website: None,
            registration_number: None,
            pan: None,
            tax_exemption_note: None,
            signatory: "Authorised Signatory".to_string(),
        }
    }
}

impl OrganizationProfile {
    /// One line of contact details, empty parts skipped
    pub fn contact_line(&self) -> String {
        [&self.phone, &self.email, &self.website]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("  |  ")
    }
}
