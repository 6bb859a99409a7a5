//! Donation statistics and receipts

use super::{not_found, parse_id};
use crate::core::entity::variant_name;
use crate::core::error::PortalResult;
use crate::entities::{Donation, DonationStatus};
use crate::render::render_receipt;
use crate::server::extract::AdminSession;
use crate::server::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Tally {
    pub count: usize,
    pub total: f64,
}

impl Tally {
    fn add(&mut self, amount: f64) {
        self.count += 1;
        self.total += amount;
    }
}

/// Body of `GET /api/donations/stats`
#[derive(Debug, Default, Serialize)]
pub struct DonationStats {
    /// Every donation regardless of status
    pub count: usize,

    /// Completed donations only
    pub completed: Tally,

    /// Completed donations grouped by payment method
    pub by_method: BTreeMap<String, Tally>,

    /// All donations grouped by status
    pub by_status: BTreeMap<String, Tally>,
}

impl DonationStats {
    pub fn from_donations(donations: &[Donation]) -> Self {
        let mut stats = DonationStats {
            count: donations.len(),
            ..Default::default()
        };
        for donation in donations {
            let status = variant_name(&donation.status).unwrap_or_default();
            stats.by_status.entry(status).or_default().add(donation.amount);

            if donation.status == DonationStatus::Completed {
                stats.completed.add(donation.amount);
                let method = variant_name(&donation.payment_method).unwrap_or_default();
                stats.by_method.entry(method).or_default().add(donation.amount);
            }
        }
        stats
    }
}

/// `GET /api/donations/stats`
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> PortalResult<Json<DonationStats>> {
    let donations = state.stores.donations.list().await?;
    Ok(Json(DonationStats::from_donations(&donations)))
}

/// `GET /api/donations/{id}/receipt`
pub async fn receipt(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> PortalResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let donation = state
        .stores
        .donations
        .get(&id)
        .await?
        .ok_or_else(|| not_found::<Donation>(id))?;

    let pdf = render_receipt(&donation, &state.config.organization)?;
    tracing::info!(receipt = %donation.receipt_number, bytes = pdf.len(), "receipt rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"receipt-{}.pdf\"",
                    donation.receipt_number
                ),
            ),
        ],
        pdf,
    ))
}
