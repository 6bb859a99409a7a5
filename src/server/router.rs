//! Routes that do not follow the collection pattern

use super::handlers::{auth, donations, members, posts, settings};
use super::state::AppState;
use axum::Router;
use axum::routing::{get, post, put};

/// Session endpoints under `/api/auth`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
}

/// Settings map under `/api/settings`
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(settings::list))
        .route(
            "/api/settings/{key}",
            put(settings::upsert).delete(settings::delete),
        )
}

/// Documents and lookups hanging off the collections
///
/// `/api/donations/stats` takes precedence over `/api/donations/{id}`
/// because static segments win over captures.
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/api/donations/stats", get(donations::stats))
        .route("/api/donations/{id}/receipt", get(donations::receipt))
        .route("/api/members/{id}/id-card", get(members::id_card))
        .route("/api/posts/slug/{slug}", get(posts::by_slug))
}
