//! ServerBuilder for fluent API to build the portal's HTTP server

use super::entity_registry::EntityRegistry;
use super::exposure::RestExposure;
use super::resource::Resource;
use super::state::{AppState, Stores};
use crate::config::AppConfig;
use crate::entities::{Donation, Event, GalleryItem, Member, Post, Volunteer};
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

/// Builder for the portal server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(config)
///     .connect_storage()
///     .await?
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    stores: Option<Stores>,
    entity_registry: EntityRegistry,
    custom_routes: Vec<Router<AppState>>,
}

impl ServerBuilder {
    /// Create a builder with every portal collection registered
    pub fn new(config: AppConfig) -> Self {
        let mut entity_registry = EntityRegistry::new();
        entity_registry.register_resource::<Donation>();
        entity_registry.register_resource::<Member>();
        entity_registry.register_resource::<Event>();
        entity_registry.register_resource::<Post>();
        entity_registry.register_resource::<Volunteer>();
        entity_registry.register_resource::<GalleryItem>();

        Self {
            config,
            stores: None,
            entity_registry,
            custom_routes: Vec::new(),
        }
    }

    /// Use these stores instead of connecting to the configured backend
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Register an extra collection
    pub fn register_resource<T: Resource>(mut self) -> Self {
        self.entity_registry.register_resource::<T>();
        self
    }

    /// Add routes that don't fit the collection pattern
    pub fn with_custom_routes(mut self, routes: Router<AppState>) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Open the stores named by `storage.backend`
    pub async fn connect_storage(mut self) -> Result<Self> {
        let stores = match self.config.storage.backend.as_str() {
            "in_memory" => {
                tracing::warn!("using in-memory storage; records are lost on restart");
                Stores::in_memory()
            }
            "mongodb" => self.connect_mongodb().await?,
            other => anyhow::bail!("unknown storage backend '{}'", other),
        };
        self.stores = Some(stores);
        Ok(self)
    }

    #[cfg(feature = "mongodb_backend")]
    async fn connect_mongodb(&self) -> Result<Stores> {
        use crate::core::error::StorageError;

        let storage = &self.config.storage;
        tracing::info!(database = %storage.database, "connecting to MongoDB");

        let connection_error = |message: String| StorageError::ConnectionError {
            backend: "mongodb".to_string(),
            message,
        };
        let client = mongodb::Client::with_uri_str(&storage.mongodb_uri)
            .await
            .map_err(|e| connection_error(e.to_string()))?;
        let stores = Stores::mongodb(client.database(&storage.database))
            .await
            .map_err(|e| connection_error(format!("{:#}", e)))?;
        Ok(stores)
    }

    #[cfg(not(feature = "mongodb_backend"))]
    async fn connect_mongodb(&self) -> Result<Stores> {
        anyhow::bail!("storage backend 'mongodb' requires the `mongodb_backend` feature")
    }

    /// Build the shared application state
    ///
    /// Falls back to in-memory stores when none were provided.
    pub fn build_state(&mut self) -> AppState {
        let stores = self.stores.take().unwrap_or_else(Stores::in_memory);
        AppState::new(self.config.clone(), stores)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        self.config.validate()?;
        let state = self.build_state();
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(RestExposure::build_router(
            state,
            &self.entity_registry,
            custom_routes,
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.bind` and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
