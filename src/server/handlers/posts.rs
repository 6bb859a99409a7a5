use super::not_found;
use crate::core::error::PortalResult;
use crate::entities::{Post, Record};
use crate::server::extract::Session;
use crate::server::state::AppState;
use axum::Json;
use axum::extract::{Path, State};

/// `GET /api/posts/slug/{slug}`
///
/// Drafts are only returned to admins.
pub async fn by_slug(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> PortalResult<Json<Post>> {
    let slug = slug.trim().to_lowercase();
    let is_admin = session.is_admin(&state);

    state
        .stores
        .posts
        .find_by("slug", &slug)
        .await?
        .into_iter()
        .find(|post| is_admin || post.publicly_visible())
        .map(Json)
        .ok_or_else(|| not_found::<Post>(slug))
}
