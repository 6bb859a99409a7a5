//! HTTP handlers

pub mod auth;
pub mod collection;
pub mod donations;
pub mod members;
pub mod posts;
pub mod settings;

use super::extract::Session;
use super::resource::Access;
use super::state::AppState;
use crate::core::Entity;
use crate::core::error::{EntityError, PortalError, ValidationError};
use uuid::Uuid;

/// Parse a path segment as a record id (400 `INVALID_ID` otherwise)
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, PortalError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ValidationError::InvalidId {
            value: raw.to_string(),
        }
        .into()
    })
}

/// Check `session` against the access level of an operation
pub(crate) fn authorize(
    access: Access,
    session: &Session,
    state: &AppState,
) -> Result<(), PortalError> {
    match access {
        Access::Public => Ok(()),
        Access::Admin => session.require(&state.admin_policy),
    }
}

pub(crate) fn not_found<T: Entity>(id: impl ToString) -> PortalError {
    EntityError::NotFound {
        entity_type: T::resource_name_singular().to_string(),
        id: id.to_string(),
    }
    .into()
}
