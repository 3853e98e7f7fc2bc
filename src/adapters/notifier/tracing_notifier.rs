//! Log-only notifier, used when no webhook is configured.

use async_trait::async_trait;

use crate::ports::{DonationNotice, DonationNotifier, NotifyError, RejectionNotice};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl DonationNotifier for TracingNotifier {
    async fn donation_granted(&self, notice: &DonationNotice) -> Result<(), NotifyError> {
        tracing::info!(
            user_id = %notice.user_id,
            username = %notice.username,
            tier = %notice.tier,
            months = notice.months,
            amount = %notice.amount,
            currency = %notice.currency,
            expire_at = notice.new_expire_at,
            txn_id = %notice.transaction_id,
            "Donation granted"
        );
        Ok(())
    }

    async fn donation_rejected(&self, notice: &RejectionNotice) -> Result<(), NotifyError> {
        tracing::warn!(
            txn_id = notice.transaction_id.as_deref().unwrap_or("-"),
            reason = notice.rejection.reason.code(),
            details = %notice.rejection.details,
            "Donation rejected"
        );
        Ok(())
    }
}
