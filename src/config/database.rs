//! Users database connection settings

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use super::error::ValidationError;

/// Connection to the database holding `users`, `user_badges` and the
/// processed notification log.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// DSN including credentials, redacted in `Debug`
    pub url: SecretString,

    /// Notifications arrive one at a time per payment, a small pool is enough
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply `migrations/` on startup
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: SecretString::new(url.into()),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: false,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Pool settings; the caller connects with `connect(url)`.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.url.expose_secret();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("DONOR_IPN__DATABASE__URL"));
        }
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    const DSN: &str = "postgres://osu:hunter2@db:5432/osu";

    #[test]
    fn test_small_pool_by_default() {
        let config = DatabaseConfig::new(DSN);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout(), Duration::from_secs(5));
        assert!(!config.run_migrations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pool_options_carry_settings() {
        let config = DatabaseConfig {
            max_connections: 2,
            acquire_timeout_secs: 1,
            ..DatabaseConfig::new(DSN)
        };
        let options = config.pool_options();
        assert_eq!(options.get_max_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let debug = format!("{:?}", DatabaseConfig::new(DSN));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_empty_url_is_missing() {
        assert!(matches!(
            DatabaseConfig::new("").validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_both_postgres_schemes_accepted() {
        assert!(DatabaseConfig::new("postgresql://localhost/osu").validate().is_ok());
        assert!(matches!(
            DatabaseConfig::new("redis://localhost").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..DatabaseConfig::new(DSN)
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPoolSize)
        ));
    }
}
