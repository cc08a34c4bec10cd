//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `ENROLL_CONFIG`) and are
//! then overridden by environment variables:
//!
//! | Variable              | Setting                      |
//! |-----------------------|------------------------------|
//! | `RAZORPAY_KEY_ID`     | `payments.key_id`            |
//! | `RAZORPAY_KEY_SECRET` | `payments.key_secret`        |
//! | `RAZORPAY_BASE_URL`   | `payments.base_url`          |
//! | `USERS_FILE`          | `storage.path`               |
//! | `ALLOWED_ORIGIN`      | `server.allowed_origin`      |
//! | `BIND_ADDR`           | `server.bind_addr`           |
//! | `DEV_MODE`            | `server.dev_mode`            |
//! | `NOTIFY_WEBHOOK_URL`  | `notifications.webhook_url`  |

use crate::core::error::ConfigError;
use crate::core::field::FieldFormat;
use crate::payments::razorpay::{DEFAULT_BASE_URL, RazorpayConfig};
use crate::storage::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_VAR: &str = "ENROLL_CONFIG";

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub payments: PaymentsConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Single cross-origin caller allowed; any origin when unset
    pub allowed_origin: Option<String>,

    /// Expose internal failure causes in error responses
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            allowed_origin: None,
            dev_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Registration collection file
    pub path: PathBuf,

    /// Attempts per write, including the first
    pub max_attempts: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            path: PathBuf::from("data/users.json"),
            max_attempts: retry.max_attempts,
            min_delay_ms: retry.min_delay.as_millis() as u64,
            max_delay_ms: retry.max_delay.as_millis() as u64,
        }
    }
}

impl StorageConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    pub key_id: String,

    #[serde(skip_serializing)]
    pub key_secret: String,

    pub base_url: String,
    pub timeout_secs: u64,
    pub default_currency: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            default_currency: "INR".to_string(),
        }
    }
}

impl PaymentsConfig {
    pub fn razorpay(&self) -> RazorpayConfig {
        RazorpayConfig::new(&self.key_id, &self.key_secret)
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

impl fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_currency", &self.default_currency)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Relay receiving registration and payment events; log only when unset
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 5,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Overlay settings from `lookup` (an environment reader)
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| non_empty(lookup(name));

        if let Some(v) = get("RAZORPAY_KEY_ID") {
            self.payments.key_id = v;
        }
        if let Some(v) = get("RAZORPAY_KEY_SECRET") {
            self.payments.key_secret = v;
        }
        if let Some(v) = get("RAZORPAY_BASE_URL") {
            self.payments.base_url = v;
        }
        if let Some(v) = get("USERS_FILE") {
            self.storage.path = PathBuf::from(v);
        }
        if let Some(v) = get("ALLOWED_ORIGIN") {
            self.server.allowed_origin = Some(v);
        }
        if let Some(v) = get("BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = get("DEV_MODE") {
            self.server.dev_mode = parse_flag("DEV_MODE", &v)?;
        }
        if let Some(v) = get("NOTIFY_WEBHOOK_URL") {
            self.notifications.webhook_url = Some(v);
        }

        Ok(())
    }

    /// Load from `ENROLL_CONFIG` (if set) and the process environment, then validate
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match non_empty(std::env::var(CONFIG_PATH_VAR).ok()) {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_from(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings the service cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payments.key_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "key_id".to_string(),
                context: "payments (RAZORPAY_KEY_ID)".to_string(),
            });
        }
        if self.payments.key_secret.is_empty() {
            return Err(ConfigError::MissingField {
                field: "key_secret".to_string(),
                context: "payments (RAZORPAY_KEY_SECRET)".to_string(),
            });
        }
        if self.payments.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "payments.timeout_secs".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !FieldFormat::CurrencyCode.validate(&self.payments.default_currency) {
            return Err(ConfigError::InvalidValue {
                field: "payments.default_currency".to_string(),
                value: self.payments.default_currency.clone(),
                message: "expected a three-letter uppercase currency code".to_string(),
            });
        }
        if self.storage.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.max_attempts".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
