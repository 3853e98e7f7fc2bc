//! EntitlementStore port - Atomic persistence of a reconciled donation.

use async_trait::async_trait;

use crate::domain::donation::EntitlementSnapshot;
use crate::domain::foundation::{DomainError, TransactionId, UserId};

/// Everything written for one granted donation.
#[derive(Debug, Clone)]
pub struct EntitlementCommit {
    pub user_id: UserId,

    /// Snapshot the reconciliation was computed from.
    pub previous: EntitlementSnapshot,

    /// Snapshot to store.
    pub next: EntitlementSnapshot,

    pub transaction_id: TransactionId,

    /// Original notification, kept in the transaction log.
    pub notification: serde_json::Value,

    /// When false, an already-recorded transaction id does not block the commit.
    pub enforce_unique: bool,
}

/// Result of attempting a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResult {
    /// Entitlement, badges and transaction record were all written.
    Committed,
    /// The transaction id was recorded by someone else first; nothing written.
    DuplicateTransaction,
    /// The user's stored entitlement no longer matches `previous`; nothing written.
    StaleSnapshot,
}

/// Port for writing a reconciled entitlement.
///
/// Implementations must perform the whole commit in one transaction:
/// 1. Record the transaction id with the notification
/// 2. Replace privileges and expiry, guarded by `previous`
/// 3. Replace the user's badge list, if it still equals `previous.badge_ids`
///
/// A crash mid-way must leave none of the three applied.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    async fn commit(&self, commit: EntitlementCommit) -> Result<CommitResult, DomainError>;
}
