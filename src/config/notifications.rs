//! Outbound notification configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Donation notice configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Discord channel webhook; notices are only logged when unset
    #[serde(default)]
    pub discord_webhook_url: Option<SecretString>,

    /// Webhook request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Delivery attempts per notice, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl NotificationsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate notification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.discord_webhook_url {
            if !url.expose_secret().starts_with("https://") {
                return Err(ValidationError::InvalidDiscordWebhook);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidRetryAttempts);
        }
        Ok(())
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            discord_webhook_url: None,
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    3
}
