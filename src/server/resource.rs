//! Binding between record types, their stores and who may reach them

use super::state::AppState;
use crate::core::DataService;
use crate::entities::{Donation, Event, GalleryItem, Member, Post, Record, Volunteer};
use std::sync::Arc;

/// Who may call an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, with or without a session
    Public,

    /// Sessions satisfying the admin policy
    Admin,
}

/// A record exposed as a REST collection under `/api/{plural}`
///
/// Updates and deletes always require [`Access::Admin`].
pub trait Resource: Record {
    /// `GET /api/{plural}`
    const LIST: Access;

    /// `GET /api/{plural}/{id}`
    const READ: Access;

    /// `POST /api/{plural}`
    const CREATE: Access;

    fn store(state: &AppState) -> &Arc<dyn DataService<Self>>;
}

impl Resource for Donation {
    const LIST: Access = Access::Admin;
    const READ: Access = Access::Admin;
    const CREATE: Access = Access::Public;

    fn store(state: &AppState) -> &Arc<dyn DataService<Self>> {
        &state.stores.donations
    }
}

impl Resource for Member {
    const LIST: Access = Access::Admin;
    const READ: Access = Access::Admin;
    const CREATE: Access = Access::Admin;

    fn store(state: &AppState) -> &Arc<dyn DataService<Self>> {
        &state.stores.members
    }
}

impl Resource for Event {
    const LIST: Access = Access::Public;
    const READ: Access = Access::Public;
    const CREATE: Access = Access::Admin;

    fn store(state: &AppState) -> &Arc<dyn DataService<Self>> {
        &state.stores.events
    }
}

impl Resource for Post {
    const LIST: Access = Access::Public;
    const READ: Access = Access::Public;
    const CREATE: Access = Access::Admin;

    fn store(state: &AppState) -> &Arc<dyn DataService<Self>> {
        &state.stores.posts
    }
}

impl Resource for Volunteer {
    const LIST: Access = Access::Admin;
    const READ: Access = Access::Admin;
    const CREATE: Access = Access::Public;

    fn store(state: &AppState) -> &Arc<dyn DataService<Self>> {
        &state.stores.volunteers
    }
}

impl Resource for GalleryItem {
    const LIST: Access = Access::Public;
    const READ: Access = Access::Public;
    const CREATE: Access = Access::Admin;

    fn store(state: &AppState) -> &Arc<dyn DataService<Self>> {
        &state.stores.gallery
    }
}
