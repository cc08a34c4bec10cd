//! Route descriptor for the registration store

use super::handlers::{RegistrationAppState, get_user, list_users, register, update_status};
use super::store::RegistrationStore;
use crate::server::route_registry::RouteDescriptor;
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

/// Descriptor for the registration routes
pub struct RegistrationDescriptor {
    pub store: Arc<RegistrationStore>,
    pub dev_mode: bool,
}

impl RegistrationDescriptor {
    pub fn new(store: Arc<RegistrationStore>, dev_mode: bool) -> Self {
        Self { store, dev_mode }
    }
}

impl RouteDescriptor for RegistrationDescriptor {
    fn name(&self) -> &str {
        "registration"
    }

    fn paths(&self) -> Vec<&'static str> {
        vec!["/register", "/users", "/users/{id}", "/users/{id}/status"]
    }

    fn build_routes(&self) -> Router {
        let state = RegistrationAppState {
            store: self.store.clone(),
            dev_mode: self.dev_mode,
        };

        Router::new()
            .route("/register", post(register))
            .route("/users", get(list_users))
            .route("/users/{id}", get(get_user))
            .route("/users/{id}/status", put(update_status))
            .with_state(state)
    }
}
