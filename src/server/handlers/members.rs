use super::{not_found, parse_id};
use crate::core::error::PortalResult;
use crate::entities::Member;
use crate::render::render_id_card;
use crate::server::extract::AdminSession;
use crate::server::state::AppState;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

/// `GET /api/members/{id}/id-card`
pub async fn id_card(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> PortalResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let member = state
        .stores
        .members
        .get(&id)
        .await?
        .ok_or_else(|| not_found::<Member>(id))?;

    let pdf = render_id_card(&member, &state.config.organization)?;
    tracing::info!(member = %member.membership_id, bytes = pdf.len(), "id card rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"id-card-{}.pdf\"",
                    member.membership_id
                ),
            ),
        ],
        pdf,
    ))
}
