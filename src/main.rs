//! enroll-server: registration and payment verification service
//!
//! Configuration is read from `ENROLL_CONFIG` (optional YAML file) and the
//! environment; see [`enroll::config`].

use anyhow::{Context, Result};
use enroll::config::AppConfig;
use enroll::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("enroll=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let notifier: Arc<dyn Notifier> = match &config.notifications.webhook_url {
        Some(url) => Arc::new(
            WebhookNotifier::new(
                url.clone(),
                Duration::from_secs(config.notifications.timeout_secs),
            )
            .context("failed to build notification client")?,
        ),
        None => Arc::new(LogNotifier),
    };

    let file_store = JsonFileStore::<RegistrationRecord>::new(&config.storage.path)
        .with_retry_policy(config.storage.retry_policy());
    let store = RegistrationStore::new(Arc::new(file_store)).with_notifier(notifier.clone());

    let provider = RazorpayProvider::new(config.payments.razorpay())
        .context("failed to build payment provider client")?;
    let verifier = SignatureVerifier::new(&config.payments.key_secret)?;
    let gateway = PaymentGateway::new(Arc::new(provider), verifier, &config.payments.key_id)
        .with_default_currency(&config.payments.default_currency)
        .with_notifier(notifier);

    tracing::info!(
        storage = %config.storage.path.display(),
        allowed_origin = config.server.allowed_origin.as_deref().unwrap_or("*"),
        dev_mode = config.server.dev_mode,
        "starting enroll-server"
    );

    let mut builder = ServerBuilder::new()
        .with_registration_store(store)
        .with_payment_gateway(gateway)
        .with_dev_mode(config.server.dev_mode);
    if let Some(origin) = &config.server.allowed_origin {
        builder = builder.with_allowed_origin(origin);
    }

    builder.serve(&config.server.bind_addr).await
}
