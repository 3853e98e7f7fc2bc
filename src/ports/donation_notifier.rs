//! DonationNotifier port - Outbound notices about processed donations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::donation::{DonorTier, Rejection};
use crate::domain::foundation::{TransactionId, UserId};

/// A granted donation, as announced to operators and the community.
#[derive(Debug, Clone, Serialize)]
pub struct DonationNotice {
    pub user_id: UserId,
    pub username: String,
    pub tier: DonorTier,
    pub months: u32,
    pub amount: Decimal,
    pub currency: String,
    pub new_expire_at: i64,
    pub transaction_id: TransactionId,
}

/// A notification that was acknowledged but not applied.
#[derive(Debug, Clone, Serialize)]
pub struct RejectionNotice {
    pub transaction_id: Option<String>,
    pub rejection: Rejection,
}

/// Failures delivering a notice.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network failure, timeout or a 5xx from the receiver.
    #[error("Notification delivery interrupted: {0}")]
    Transient(String),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

impl NotifyError {
    /// Transient failures are worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, NotifyError::Transient(_))
    }
}

/// Port for outbound donation notices.
///
/// Delivery failures are logged by the caller and never undo a grant.
#[async_trait]
pub trait DonationNotifier: Send + Sync {
    async fn donation_granted(&self, notice: &DonationNotice) -> Result<(), NotifyError>;

    async fn donation_rejected(&self, notice: &RejectionNotice) -> Result<(), NotifyError>;
}
