//! Razorpay REST client
//!
//! Implements [`PaymentProvider`] over the provider's v1 API with HTTP basic
//! auth (key id / key secret) and a per-request timeout. Calls are not
//! retried here; a timeout surfaces as [`ProviderError::Timeout`].

use super::model::{NewOrder, Order, OrderQuery, OrderSummary, Payment};
use super::provider::{PaymentProvider, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.razorpay.com/v1";

/// Connection settings for [`RazorpayProvider`]
#[derive(Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Provider error body: `{"error": {"code": ..., "description": ...}}`
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// List responses wrap their entities in a collection
#[derive(Deserialize)]
struct Collection<T> {
    items: Vec<T>,
}

pub struct RazorpayProvider {
    client: Client,
    config: RazorpayConfig,
}

impl RazorpayProvider {
    pub fn new(config: RazorpayConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, ProviderError> {
        let response = request
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        debug!(resource, status = status.as_u16(), "provider responded");

        if !status.is_success() {
            return Err(api_error(status, &body, resource));
        }

        serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaymentProvider for RazorpayProvider {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ProviderError> {
        let request = self.client.post(self.url("orders")).json(order);
        self.send(request, &order.receipt).await
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, ProviderError> {
        let request = self.client.get(self.url(&format!("payments/{}", payment_id)));
        self.send(request, payment_id).await
    }

    async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<OrderSummary>, ProviderError> {
        let request = self.client.get(self.url("orders")).query(query);
        let collection: Collection<OrderSummary> = self.send(request, "orders").await?;
        Ok(collection.items)
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}

fn api_error(status: StatusCode, body: &[u8], resource: &str) -> ProviderError {
    let (code, message) = match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope.error.code.unwrap_or_default(),
            envelope.error.description.unwrap_or_default(),
        ),
        Err(_) => (
            String::new(),
            String::from_utf8_lossy(body).chars().take(200).collect(),
        ),
    };

    if status == StatusCode::NOT_FOUND || message.to_lowercase().contains("does not exist") {
        return ProviderError::NotFound(resource.to_string());
    }

    ProviderError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}
