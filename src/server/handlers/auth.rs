//! Login, logout and session introspection

use crate::core::auth::{authenticate, clear_session_cookie, session_cookie};
use crate::core::error::{PortalResult, RequestError};
use crate::core::validation::Valid;
use crate::core::{AuthContext, AuthPolicy};
use crate::server::extract::Session;
use crate::server::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{AppendHeaders, IntoResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

fn user_json(context: &AuthContext) -> Value {
    match context {
        AuthContext::User {
            user_id,
            email,
            name,
            roles,
        } => json!({ "id": user_id, "email": email, "name": name, "roles": roles }),
        AuthContext::Anonymous => Value::Null,
    }
}

/// `POST /api/auth/login`
///
/// Sets the session cookie and also returns the token for clients that
/// prefer an `Authorization: Bearer` header.
pub async fn login(
    State(state): State<AppState>,
    Valid(input): Valid<LoginRequest>,
) -> PortalResult<impl IntoResponse> {
    let Some(account) = authenticate(&state.config.auth.accounts, &input.email, &input.password)
    else {
        tracing::warn!(email = %input.email, "rejected login");
        return Err(RequestError::Unauthorized {
            message: "invalid email or password".to_string(),
        }
        .into());
    };

    let token = state.sessions.issue(account)?;
    let max_age = state.sessions.ttl_seconds();
    let cookie = session_cookie(&token, max_age, state.config.auth.secure_cookies);

    let context = AuthContext::User {
        user_id: account.email.clone(),
        email: account.email.clone(),
        name: account.name.clone(),
        roles: account.roles.clone(),
    };
    tracing::info!(email = %account.email, "session started");

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({
            "user": user_json(&context),
            "token": token,
            "expires_in": max_age,
        })),
    ))
}

/// `POST /api/auth/logout`
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.config.auth.secure_cookies);
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({ "logged_out": true })),
    )
}

/// `GET /api/auth/session`
pub async fn session(
    State(state): State<AppState>,
    session: Session,
) -> PortalResult<Json<Value>> {
    session.require(&AuthPolicy::Authenticated)?;
    Ok(Json(json!({
        "user": user_json(&session.0),
        "is_admin": session.is_admin(&state),
    })))
}
