//! Route registry for assembling the HTTP surface from route groups

use axum::Router;
use std::collections::HashMap;

/// Trait that describes how to build the routes of one route group
///
/// Each group (registration, payments, ...) implements this trait to
/// contribute its routes with its own state already applied.
pub trait RouteDescriptor: Send + Sync {
    /// Group name (e.g., "registration")
    fn name(&self) -> &str;

    /// Paths served by this group, for startup logging
    fn paths(&self) -> Vec<&'static str>;

    /// Build the routes of this group
    fn build_routes(&self) -> Router;
}

/// Registry for all route groups of the application
#[derive(Default)]
pub struct RouteRegistry {
    descriptors: HashMap<String, Box<dyn RouteDescriptor>>,
}

impl RouteRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register a route group
    ///
    /// Registering a second group under the same name replaces the first.
    pub fn register(&mut self, descriptor: Box<dyn RouteDescriptor>) {
        let name = descriptor.name().to_string();
        self.descriptors.insert(name, descriptor);
    }

    /// Merge the routes of every registered group into one router
    pub fn build_routes(&self) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    /// Names of all registered groups, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Every registered path, sorted
    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<&'static str> = self
            .descriptors
            .values()
            .flat_map(|d| d.paths())
            .collect();
        paths.sort_unstable();
        paths
    }
}
