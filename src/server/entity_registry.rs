//! Entity registry for collecting record descriptors and generating CRUD routes

use super::handlers::collection;
use super::resource::Resource;
use super::state::AppState;
use axum::Router;
use axum::routing::get;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Trait that describes how to build routes for a record type
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "donation")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "donations")
    fn plural(&self) -> &str;

    /// Build the CRUD routes for this record type
    ///
    /// - GET/POST /api/{plural}
    /// - GET/PUT/DELETE /api/{plural}/{id}
    fn build_routes(&self) -> Router<AppState>;
}

/// Descriptor serving any [`Resource`] through the shared collection handlers
pub struct CollectionDescriptor<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T: Resource> CollectionDescriptor<T> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T: Resource> Default for CollectionDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> EntityDescriptor for CollectionDescriptor<T> {
    fn entity_type(&self) -> &str {
        T::resource_name_singular()
    }

    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router<AppState> {
        let collection_path = format!("/api/{}", T::resource_name());
        let item_path = format!("{}/{{id}}", collection_path);

        Router::new()
            .route(
                &collection_path,
                get(collection::list::<T>).post(collection::create::<T>),
            )
            .route(
                &item_path,
                get(collection::get::<T>)
                    .put(collection::update::<T>)
                    .delete(collection::delete::<T>),
            )
    }
}

/// Registry for all record collections in the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register a descriptor, keyed by its entity type
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Register the collection routes of `T`
    pub fn register_resource<T: Resource>(&mut self) {
        self.register(Box::new(CollectionDescriptor::<T>::new()));
    }

    /// Merge the routes of every registered descriptor
    pub fn build_routes(&self) -> Router<AppState> {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            tracing::debug!(plural = descriptor.plural(), "mounting collection");
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
