//! # NGO Portal
//!
//! JSON API and admin backend for a non-profit's website.
//!
//! ## Features
//!
//! - **Collections**: donations, members, events, posts, volunteers and
//!   gallery items, each with list/get/create/update/delete routes
//! - **Settings**: a key → JSON value map for site-wide configuration
//! - **Sessions**: JWT cookie sessions with role-based admin access
//! - **Documents**: PDF donation receipts (amount in words) and member ID
//!   cards with a QR code
//! - **Storage**: in-memory stores, or MongoDB behind the `mongodb_backend`
//!   feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portal::prelude::*;
//!
//! let config = AppConfig::load()?;
//! ServerBuilder::new(config)
//!     .connect_storage()
//!     .await?
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod render;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, SessionKeys},
        entity::Entity,
        error::{PortalError, PortalResult},
        query::{PaginatedResponse, QueryParams},
        service::DataService,
        validation::Valid,
    };

    // === Records ===
    pub use crate::entities::{
        CreateContext, Donation, DonationStatus, Event, EventStatus, GalleryItem, Member,
        MemberStatus, MembershipType, PaymentMethod, Post, Record, Setting, Volunteer,
        VolunteerStatus,
    };

    // === Documents ===
    pub use crate::render::{OrganizationProfile, amount_in_words, render_id_card, render_receipt};

    // === Storage ===
    pub use crate::storage::InMemoryDataService;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, EntityDescriptor, EntityRegistry, ServerBuilder, Stores};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
