//! HTTP server for the portal
//!
//! The `ServerBuilder` registers a REST collection for every record type,
//! adds the auth, settings and document routes, and serves the result.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod extract;
pub mod handlers;
pub mod resource;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use entity_registry::{CollectionDescriptor, EntityDescriptor, EntityRegistry};
pub use extract::{AdminSession, Session};
pub use resource::{Access, Resource};
pub use state::{AppState, Stores};
