//! Server module for building the HTTP surface
//!
//! The `ServerBuilder` mounts:
//! - health routes
//! - the registration route group
//! - the payment route group, when a gateway is configured

pub mod builder;
pub mod route_registry;

pub use builder::ServerBuilder;
pub use route_registry::{RouteDescriptor, RouteRegistry};
