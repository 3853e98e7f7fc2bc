//! UserRepository port - Reads a user's donor entitlement.

use async_trait::async_trait;

use crate::domain::donation::{EntitlementSnapshot, UserIdentifier};
use crate::domain::foundation::{DomainError, UserId};

/// A user record reduced to what reconciliation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorAccount {
    pub user_id: UserId,
    pub username: String,
    pub snapshot: EntitlementSnapshot,
}

/// Port for resolving a notification's user and reading their entitlement.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id or username, with privileges, expiry and badges.
    ///
    /// Returns `None` if no such user exists.
    async fn find_account(
        &self,
        identifier: &UserIdentifier,
    ) -> Result<Option<DonorAccount>, DomainError>;
}
