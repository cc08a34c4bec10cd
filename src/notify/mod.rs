//! Registration and payment notifications
//!
//! Notifications are best-effort: they are dispatched after the operation
//! has already succeeded and their failures are only logged.

use crate::payments::model::Payment;
use crate::registration::model::RegistrationRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Receiver of domain events
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn registration_created(&self, record: &RegistrationRecord);

    async fn payment_verified(&self, payment: &Payment);
}

/// Run a notification in the background so the caller never waits on it
pub(crate) fn dispatch<F, Fut>(notifier: &Arc<dyn Notifier>, send: F)
where
    F: FnOnce(Arc<dyn Notifier>) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(send(notifier.clone()));
}

/// Emits notifications as structured log events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn registration_created(&self, record: &RegistrationRecord) {
        info!(
            event = "registration.created",
            registration_id = %record.id,
            course = %record.course,
            "new registration"
        );
    }

    async fn payment_verified(&self, payment: &Payment) {
        info!(
            event = "payment.verified",
            payment_id = %payment.id,
            order_id = payment.order_id.as_deref().unwrap_or_default(),
            amount = payment.amount,
            currency = %payment.currency,
            "payment verified"
        );
    }
}

#[derive(Serialize)]
struct WebhookBody<T: Serialize> {
    event: &'static str,
    data: T,
    sent_at: DateTime<Utc>,
}

/// POSTs events as JSON to a relay endpoint (for example an email relay)
///
/// Registration events carry the summary projection, never the phone number.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn post<T: Serialize + Send + Sync>(&self, event: &'static str, data: T) {
        let body = WebhookBody {
            event,
            data,
            sent_at: Utc::now(),
        };

        match self.client.post(&self.url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(event, url = %self.url, "notification delivered");
            }
            Ok(response) => {
                warn!(event, url = %self.url, status = %response.status(), "notification rejected");
            }
            Err(e) => {
                warn!(event, url = %self.url, error = %e, "notification failed");
            }
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn registration_created(&self, record: &RegistrationRecord) {
        self.post("registration.created", record.summary()).await;
    }

    async fn payment_verified(&self, payment: &Payment) {
        self.post("payment.verified", payment).await;
    }
}
