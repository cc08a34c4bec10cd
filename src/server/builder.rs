//! ServerBuilder for fluent API to build the HTTP server

use super::route_registry::RouteRegistry;
use crate::payments::{PaymentDescriptor, PaymentGateway};
use crate::registration::{RegistrationDescriptor, RegistrationStore};
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for the enroll HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_registration_store(RegistrationStore::new(Arc::new(file_store)))
///     .with_payment_gateway(gateway)
///     .with_allowed_origin("https://example.com")
///     .build()?;
/// ```
pub struct ServerBuilder {
    registration_store: Option<Arc<RegistrationStore>>,
    payment_gateway: Option<Arc<PaymentGateway>>,
    allowed_origin: Option<String>,
    dev_mode: bool,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            registration_store: None,
            payment_gateway: None,
            allowed_origin: None,
            dev_mode: false,
            custom_routes: Vec::new(),
        }
    }

    /// Set the registration store (required)
    pub fn with_registration_store(mut self, store: impl Into<Arc<RegistrationStore>>) -> Self {
        self.registration_store = Some(store.into());
        self
    }

    /// Set the payment gateway
    ///
    /// Without one the payment routes are not mounted.
    pub fn with_payment_gateway(mut self, gateway: impl Into<Arc<PaymentGateway>>) -> Self {
        self.payment_gateway = Some(gateway.into());
        self
    }

    /// Restrict cross-origin callers to a single origin
    ///
    /// When unset any origin is allowed.
    pub fn with_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origin = Some(origin.into());
        self
    }

    /// Include internal failure causes in error responses
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Collect the route groups configured on this builder
    fn registry(&self) -> Result<RouteRegistry> {
        let store = self.registration_store.clone().ok_or_else(|| {
            anyhow::anyhow!("RegistrationStore is required. Call .with_registration_store()")
        })?;

        let mut registry = RouteRegistry::new();
        registry.register(Box::new(RegistrationDescriptor::new(store, self.dev_mode)));

        if let Some(gateway) = &self.payment_gateway {
            registry.register(Box::new(PaymentDescriptor::new(
                gateway.clone(),
                self.dev_mode,
            )));
        }

        Ok(registry)
    }

    fn cors_layer(&self) -> Result<CorsLayer> {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        match &self.allowed_origin {
            Some(origin) => {
                let origin = HeaderValue::from_str(origin)
                    .with_context(|| format!("invalid allowed origin '{}'", origin))?;
                Ok(cors.allow_origin(origin))
            }
            None => Ok(cors.allow_origin(Any)),
        }
    }

    /// Build the final router
    ///
    /// This generates:
    /// - health routes
    /// - registration routes
    /// - payment routes (when a gateway is configured)
    /// - custom routes
    pub fn build(self) -> Result<Router> {
        let registry = self.registry()?;
        let cors = self.cors_layer()?;

        tracing::debug!(groups = ?registry.names(), paths = ?registry.paths(), "routes assembled");

        let mut app = health_routes().merge(registry.build_routes());
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build health check routes
fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "enroll-rs"
    }))
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
