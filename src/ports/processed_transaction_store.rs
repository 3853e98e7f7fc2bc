//! ProcessedTransactionStore port - Idempotency guard for donations.
//!
//! The processor may deliver the same notification more than once:
//! - Network retries after a timeout
//! - A 5xx response from our endpoint
//! - Manual resends from the processor dashboard
//!
//! A transaction id must grant entitlement at most once. This port answers
//! whether an id was already applied; recording an id happens inside
//! [`EntitlementStore::commit`](super::EntitlementStore::commit) so it is
//! atomic with the entitlement update.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TransactionId};

/// Port for checking which transactions have been applied.
#[async_trait]
pub trait ProcessedTransactionStore: Send + Sync {
    /// Returns `true` if this transaction id was already applied.
    async fn already_processed(&self, transaction_id: &TransactionId)
        -> Result<bool, DomainError>;
}
