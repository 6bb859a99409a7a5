//! Shared application state

use crate::config::AppConfig;
use crate::core::{AuthPolicy, DataService, SessionKeys};
use crate::entities::{Donation, Event, GalleryItem, Member, Post, Setting, Volunteer};
use crate::storage::InMemoryDataService;
use std::sync::Arc;

/// One store per record type
#[derive(Clone)]
pub struct Stores {
    pub donations: Arc<dyn DataService<Donation>>,
    pub members: Arc<dyn DataService<Member>>,
    pub events: Arc<dyn DataService<Event>>,
    pub posts: Arc<dyn DataService<Post>>,
    pub volunteers: Arc<dyn DataService<Volunteer>>,
    pub gallery: Arc<dyn DataService<GalleryItem>>,
    pub settings: Arc<dyn DataService<Setting>>,
}

impl Stores {
    /// Process-local stores; contents are lost on restart
    pub fn in_memory() -> Self {
        Self {
            donations: Arc::new(InMemoryDataService::new()),
            members: Arc::new(InMemoryDataService::new()),
            events: Arc::new(InMemoryDataService::new()),
            posts: Arc::new(InMemoryDataService::new()),
            volunteers: Arc::new(InMemoryDataService::new()),
            gallery: Arc::new(InMemoryDataService::new()),
            settings: Arc::new(InMemoryDataService::new()),
        }
    }

    /// MongoDB-backed stores, one collection per record type
    ///
    /// Unique indexes are created before the stores are handed out.
    #[cfg(feature = "mongodb_backend")]
    pub async fn mongodb(database: mongodb::Database) -> anyhow::Result<Self> {
        use crate::storage::MongoDataService;

        let donations = MongoDataService::<Donation>::new(database.clone());
        let members = MongoDataService::<Member>::new(database.clone());
        let events = MongoDataService::<Event>::new(database.clone());
        let posts = MongoDataService::<Post>::new(database.clone());
        let volunteers = MongoDataService::<Volunteer>::new(database.clone());
        let gallery = MongoDataService::<GalleryItem>::new(database.clone());
        let settings = MongoDataService::<Setting>::new(database);

        donations.ensure_indexes().await?;
        members.ensure_indexes().await?;
        events.ensure_indexes().await?;
        posts.ensure_indexes().await?;
        volunteers.ensure_indexes().await?;
        gallery.ensure_indexes().await?;
        settings.ensure_indexes().await?;

        Ok(Self {
            donations: Arc::new(donations),
            members: Arc::new(members),
            events: Arc::new(events),
            posts: Arc::new(posts),
            volunteers: Arc::new(volunteers),
            gallery: Arc::new(gallery),
            settings: Arc::new(settings),
        })
    }
}

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionKeys>,

    /// Policy guarding every management route
    pub admin_policy: Arc<AuthPolicy>,

    pub stores: Stores,
}

impl AppState {
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let sessions = SessionKeys::from_config(&config.auth);
        let admin_policy = AuthPolicy::HasRole(config.auth.admin_roles.clone());
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            admin_policy: Arc::new(admin_policy),
            stores,
        }
    }
}
