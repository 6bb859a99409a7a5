//! REST API exposure
//!
//! Consumes the shared [`AppState`] and the registered collections and
//! produces the final Axum `Router`, with tracing and CORS layers applied.

use crate::config::ServerConfig;
use crate::server::entity_registry::EntityRegistry;
use crate::server::router::{auth_routes, document_routes, settings_routes};
use crate::server::state::AppState;
use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// The returned router contains:
    /// - Health check routes
    /// - Collection CRUD routes from `registry`
    /// - Auth, settings and document routes
    /// - Custom routes
    pub fn build_router(
        state: AppState,
        registry: &EntityRegistry,
        custom_routes: Vec<Router<AppState>>,
    ) -> Router {
        let mut app = Self::health_routes()
            .merge(registry.build_routes())
            .merge(auth_routes())
            .merge(settings_routes())
            .merge(document_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Self::cors_layer(&state.config.server));
        app.layer(middleware).with_state(state)
    }

    /// CORS for the configured front-end origins
    ///
    /// Without configured origins any origin may call the API, but browsers
    /// will not attach the session cookie cross-origin.
    fn cors_layer(config: &ServerConfig) -> CorsLayer {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
        let headers = [header::CONTENT_TYPE, header::AUTHORIZATION];
        if origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(headers);
        }

        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods(methods)
            .allow_headers(headers)
    }

    /// Build health check routes
    fn health_routes() -> Router<AppState> {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check(State(state): State<AppState>) -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "ngo-portal",
            "storage": state.config.storage.backend,
        }))
    }
}
