//! Payment processor configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::paypal::PAYPAL_SANDBOX_VERIFY_URL;
use crate::domain::donation::IpnPolicy;

/// PayPal IPN configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Account that must have received the payment
    #[serde(default)]
    pub business_email: String,

    /// Accepted ISO currency codes (comma-separated)
    #[serde(default = "default_accepted_currencies")]
    pub accepted_currencies: String,

    /// Postback verification endpoint
    #[serde(default = "default_ipn_verify_url")]
    pub ipn_verify_url: String,

    /// Postback request timeout in seconds
    #[serde(default = "default_verify_timeout")]
    pub verify_timeout_secs: u64,

    /// Postback attempts before giving up
    #[serde(default = "default_verify_attempts")]
    pub verify_max_attempts: u32,
}

impl PaymentConfig {
    /// Get accepted currencies as upper-cased codes
    pub fn accepted_currencies_list(&self) -> Vec<String> {
        self.accepted_currencies
            .split(',')
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    /// Acceptance rules for incoming notifications
    pub fn ipn_policy(&self) -> IpnPolicy {
        IpnPolicy {
            business_email: self.business_email.trim().to_string(),
            accepted_currencies: self.accepted_currencies_list(),
        }
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let email = self.business_email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingRequired(
                "DONOR_IPN__PAYMENT__BUSINESS_EMAIL",
            ));
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidBusinessEmail);
        }

        let currencies = self.accepted_currencies_list();
        if currencies.is_empty() {
            return Err(ValidationError::NoAcceptedCurrencies);
        }
        if let Some(bad) = currencies
            .iter()
            .find(|c| c.len() != 3 || !c.chars().all(|ch| ch.is_ascii_alphabetic()))
        {
            return Err(ValidationError::InvalidCurrency(bad.clone()));
        }

        if self.verify_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.verify_max_attempts == 0 {
            return Err(ValidationError::InvalidRetryAttempts);
        }

        if *environment == Environment::Production && !self.ipn_verify_url.starts_with("https://")
        {
            return Err(ValidationError::VerifyUrlMustBeHttps);
        }
        if *environment == Environment::Production
            && self.ipn_verify_url == PAYPAL_SANDBOX_VERIFY_URL
        {
            return Err(ValidationError::SandboxVerifyUrlInProduction);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            business_email: String::new(),
            accepted_currencies: default_accepted_currencies(),
            ipn_verify_url: default_ipn_verify_url(),
            verify_timeout_secs: default_verify_timeout(),
            verify_max_attempts: default_verify_attempts(),
        }
    }
}

fn default_accepted_currencies() -> String {
    "EUR".to_string()
}

fn default_ipn_verify_url() -> String {
    crate::adapters::paypal::PAYPAL_LIVE_VERIFY_URL.to_string()
}

fn default_verify_timeout() -> u64 {
    10
}

fn default_verify_attempts() -> u32 {
    3
}
