//! Core traits and types shared by the storage and server layers

pub mod auth;
pub mod entity;
pub mod error;
pub mod query;
pub mod service;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, SessionKeys, extract_token};
pub use entity::Entity;
pub use error::{PortalError, PortalResult};
pub use query::{PaginatedResponse, QueryParams};
pub use service::DataService;
