//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DONOR_IPN` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use donor_ipn::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod features;
mod notifications;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use notifications::NotificationsConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment processor configuration (PayPal IPN)
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Outbound donation notices
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DONOR_IPN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DONOR_IPN__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `DONOR_IPN__PAYMENT__BUSINESS_EMAIL=...` -> `payment.business_email = ...`
    /// - `DONOR_IPN__FEATURES__WRITE_TO_USERS_DB=false` -> dry-run mode
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DONOR_IPN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate(&self.server.environment)?;
        self.notifications.validate()?;

        let verify_budget = self.payment.verify_timeout() * self.payment.verify_max_attempts;
        if self.server.request_timeout() <= verify_budget {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs: self.server.request_timeout_secs,
                verify_secs: verify_budget.as_secs(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DONOR_IPN__DATABASE__URL",
        "DONOR_IPN__PAYMENT__BUSINESS_EMAIL",
        "DONOR_IPN__PAYMENT__ACCEPTED_CURRENCIES",
        "DONOR_IPN__SERVER__PORT",
        "DONOR_IPN__SERVER__ENVIRONMENT",
        "DONOR_IPN__SERVER__REQUEST_TIMEOUT_SECS",
        "DONOR_IPN__FEATURES__WRITE_TO_USERS_DB",
        "DONOR_IPN__FEATURES__REQUIRE_IPN_VERIFICATION",
    ];

    fn set_minimal_env() {
        env::set_var("DONOR_IPN__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("DONOR_IPN__PAYMENT__BUSINESS_EMAIL", "donations@example.org");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(
            config.database.url.expose_secret(),
            "postgresql://test@localhost/test"
        );
        assert_eq!(config.payment.business_email, "donations@example.org");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_database_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("DONOR_IPN__PAYMENT__BUSINESS_EMAIL", "donations@example.org");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.payment.accepted_currencies_list(), vec!["EUR"]);
        assert!(config.features.write_to_users_db);
        assert!(config.features.enforce_unique_payments);
        assert!(config.features.require_ipn_verification);
        assert!(config.notifications.discord_webhook_url.is_none());
    }

    #[test]
    fn test_feature_flags_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DONOR_IPN__FEATURES__WRITE_TO_USERS_DB", "false");
        env::set_var("DONOR_IPN__FEATURES__REQUIRE_IPN_VERIFICATION", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(!config.features.write_to_users_db);
        assert!(!config.features.require_ipn_verification);
        assert!(config.features.enforce_unique_payments);
    }

    #[test]
    fn test_currency_list_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DONOR_IPN__PAYMENT__ACCEPTED_CURRENCIES", "EUR,USD");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.payment.accepted_currencies_list(), vec!["EUR", "USD"]);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DONOR_IPN__SERVER__ENVIRONMENT", "production");
        env::set_var("DONOR_IPN__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.server.is_production());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_request_timeout_must_outlast_verification() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DONOR_IPN__SERVER__REQUEST_TIMEOUT_SECS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::RequestTimeoutTooShort {
                request_secs: 30,
                verify_secs: 30
            })
        ));
    }
}
