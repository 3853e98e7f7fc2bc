//! Infrastructure errors for payment notification handling.
//!
//! Business rejections are not errors: they are acknowledged with 200 so the
//! processor does not retry. Only the failures below reach the caller as
//! errors, and their status codes decide whether the processor redelivers.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur while processing a payment notification.
#[derive(Debug, Error)]
pub enum IpnError {
    /// Postback verification could not be completed.
    #[error("Verification unavailable: {0}")]
    VerificationUnavailable(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The user record kept changing underneath the reconciliation.
    #[error("Concurrent update conflict for user {0}")]
    Conflict(i64),

    /// Request body could not be read as a form.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl IpnError {
    /// Returns true if the processor should redeliver this notification.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            IpnError::VerificationUnavailable(_) | IpnError::Database(_) | IpnError::Conflict(_)
        )
    }

    /// Maps the error to an HTTP status code.
    ///
    /// - 4xx: malformed request, no retry
    /// - 5xx: transient failure, the processor will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            IpnError::ParseError(_) => StatusCode::BAD_REQUEST,
            IpnError::VerificationUnavailable(_) => StatusCode::BAD_GATEWAY,
            IpnError::Database(_) | IpnError::Conflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for IpnError {
    fn from(err: DomainError) -> Self {
        IpnError::Database(err.to_string())
    }
}
