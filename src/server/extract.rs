//! Session extractors
//!
//! [`Session`] never rejects: a missing or invalid token yields
//! `AuthContext::Anonymous`, and the route's policy decides what that means.
//! [`AdminSession`] rejects with 401/403 before the body is read.

use super::state::AppState;
use crate::core::error::PortalError;
use crate::core::{AuthContext, AuthPolicy, extract_token};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// The caller's session, possibly anonymous
#[derive(Debug, Clone)]
pub struct Session(pub AuthContext);

impl Session {
    /// Check the session against `policy` (401 anonymous, 403 signed in)
    pub fn require(&self, policy: &AuthPolicy) -> Result<(), PortalError> {
        policy.authorize(&self.0).map_err(PortalError::from)
    }

    /// Whether the session satisfies the admin policy
    pub fn is_admin(&self, state: &AppState) -> bool {
        state.admin_policy.check(&self.0)
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let context = match extract_token(&parts.headers) {
            Some(token) => match state.sessions.verify(&token) {
                Ok(claims) => claims.into(),
                Err(_) => AuthContext::Anonymous,
            },
            None => AuthContext::Anonymous,
        };
        Ok(Session(context))
    }
}

/// A session that passed the admin policy
#[derive(Debug, Clone)]
pub struct AdminSession(pub AuthContext);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Ok(Session(context)) = Session::from_request_parts(parts, state).await;
        state.admin_policy.authorize(&context)?;
        Ok(AdminSession(context))
    }
}
