//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Retry attempts must be at least 1")]
    InvalidRetryAttempts,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Database pool must allow at least one connection")]
    InvalidPoolSize,

    #[error("Request timeout of {request_secs}s does not cover {verify_secs}s of IPN verification")]
    RequestTimeoutTooShort { request_secs: u64, verify_secs: u64 },

    #[error("Invalid business email address")]
    InvalidBusinessEmail,

    #[error("No accepted currencies configured")]
    NoAcceptedCurrencies,

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("IPN verification URL must use HTTPS in production")]
    VerifyUrlMustBeHttps,

    #[error("PayPal sandbox verification URL configured in production")]
    SandboxVerifyUrlInProduction,

    #[error("Invalid Discord webhook URL")]
    InvalidDiscordWebhook,
}
