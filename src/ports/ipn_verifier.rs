//! IpnVerifier port - Confirms a notification with the payment processor.

use async_trait::async_trait;
use thiserror::Error;

/// The processor's verdict on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpnVerification {
    /// The processor sent this notification.
    Verified,
    /// The processor does not recognise this notification.
    Invalid,
}

/// Failures talking to the processor.
#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    /// Network failure or timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Processor answered with a 5xx.
    #[error("Processor unavailable: HTTP {0}")]
    Unavailable(u16),

    /// Processor answered with something other than a verdict.
    #[error("Unexpected verification response: {0}")]
    UnexpectedResponse(String),
}

impl VerificationError {
    /// Transient failures are worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VerificationError::Transport(_) | VerificationError::Unavailable(_)
        )
    }
}

/// Port for verifying notification authenticity.
#[async_trait]
pub trait IpnVerifier: Send + Sync {
    /// Send the notification's fields, in arrival order, back for verification.
    async fn verify(&self, fields: &[(String, String)])
        -> Result<IpnVerification, VerificationError>;
}
