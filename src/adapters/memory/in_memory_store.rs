//! In-memory donor store.
//!
//! Implements every storage port over one `RwLock`, so a commit is atomic
//! with respect to concurrent reads. Used by tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::donation::{EntitlementSnapshot, Privileges, UserIdentifier};
use crate::domain::foundation::{DomainError, ErrorCode, TransactionId, UserId};
use crate::ports::{
    CommitResult, DonorAccount, EntitlementCommit, EntitlementStore, ProcessedTransactionStore,
    UserRepository,
};

#[derive(Debug, Clone)]
struct UserRow {
    username: String,
    privileges: Privileges,
    donor_expire: i64,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, UserRow>,
    user_badges: HashMap<UserId, Vec<i32>>,
    notifications: HashMap<String, serde_json::Value>,
}

impl Tables {
    fn account(&self, user_id: UserId) -> Option<DonorAccount> {
        let row = self.users.get(&user_id)?;
        Some(DonorAccount {
            user_id,
            username: row.username.clone(),
            snapshot: EntitlementSnapshot::new(
                row.privileges,
                row.donor_expire,
                self.user_badges.get(&user_id).cloned().unwrap_or_default(),
            ),
        })
    }
}

/// In-memory implementation of the storage ports.
#[derive(Debug, Default)]
pub struct InMemoryDonorStore {
    tables: RwLock<Tables>,
}

impl InMemoryDonorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user with the given entitlement.
    pub async fn insert_user(
        &self,
        user_id: UserId,
        username: impl Into<String>,
        snapshot: EntitlementSnapshot,
    ) {
        let mut tables = self.tables.write().await;
        tables.users.insert(
            user_id,
            UserRow {
                username: username.into(),
                privileges: snapshot.privileges,
                donor_expire: snapshot.expire_at,
            },
        );
        tables.user_badges.insert(user_id, snapshot.badge_ids);
    }

    /// Current entitlement of a user, if present.
    pub async fn snapshot_of(&self, user_id: UserId) -> Option<EntitlementSnapshot> {
        self.tables
            .read()
            .await
            .account(user_id)
            .map(|account| account.snapshot)
    }

    /// The notification recorded under a transaction id.
    pub async fn recorded_notification(&self, transaction_id: &str) -> Option<serde_json::Value> {
        self.tables
            .read()
            .await
            .notifications
            .get(transaction_id)
            .cloned()
    }

    pub async fn processed_count(&self) -> usize {
        self.tables.read().await.notifications.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryDonorStore {
    async fn find_account(
        &self,
        identifier: &UserIdentifier,
    ) -> Result<Option<DonorAccount>, DomainError> {
        let tables = self.tables.read().await;
        let user_id = match identifier {
            UserIdentifier::Id(id) => Some(*id),
            UserIdentifier::Username(name) => tables
                .users
                .iter()
                .find(|(_, row)| &row.username == name)
                .map(|(id, _)| *id),
        };
        Ok(user_id.and_then(|id| tables.account(id)))
    }
}

#[async_trait]
impl ProcessedTransactionStore for InMemoryDonorStore {
    async fn already_processed(&self, transaction_id: &TransactionId) -> Result<bool, DomainError> {
        Ok(self
            .tables
            .read()
            .await
            .notifications
            .contains_key(transaction_id.as_str()))
    }
}

#[async_trait]
impl EntitlementStore for InMemoryDonorStore {
    async fn commit(&self, commit: EntitlementCommit) -> Result<CommitResult, DomainError> {
        let mut tables = self.tables.write().await;

        let Some(row) = tables.users.get(&commit.user_id) else {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User {} disappeared before commit", commit.user_id),
            ));
        };

        if tables
            .notifications
            .contains_key(commit.transaction_id.as_str())
            && commit.enforce_unique
        {
            return Ok(CommitResult::DuplicateTransaction);
        }

        let badges = tables
            .user_badges
            .get(&commit.user_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if row.privileges != commit.previous.privileges
            || row.donor_expire != commit.previous.expire_at
            || badges != commit.previous.badge_ids.as_slice()
        {
            return Ok(CommitResult::StaleSnapshot);
        }

        tables
            .notifications
            .entry(commit.transaction_id.as_str().to_string())
            .or_insert(commit.notification);

        if let Some(row) = tables.users.get_mut(&commit.user_id) {
            row.privileges = commit.next.privileges;
            row.donor_expire = commit.next.expire_at;
        }
        tables.user_badges.insert(commit.user_id, commit.next.badge_ids);

        Ok(CommitResult::Committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::donation::{PREMIUM_BADGE_ID, SUPPORTER_BADGE_ID};
    use serde_json::json;

    fn user_id() -> UserId {
        UserId::new(7).unwrap()
    }

    fn supporter() -> EntitlementSnapshot {
        EntitlementSnapshot::new(Privileges::SUPPORTER, 1_700_000_000, vec![SUPPORTER_BADGE_ID])
    }

    fn premium() -> EntitlementSnapshot {
        EntitlementSnapshot::new(
            Privileges::SUPPORTER.union(Privileges::PREMIUM),
            1_702_592_000,
            vec![PREMIUM_BADGE_ID],
        )
    }

    fn commit(txn: &str, previous: EntitlementSnapshot) -> EntitlementCommit {
        EntitlementCommit {
            user_id: user_id(),
            previous,
            next: premium(),
            transaction_id: TransactionId::new(txn).unwrap(),
            notification: json!({ "txn_id": txn }),
            enforce_unique: true,
        }
    }

    async fn seeded() -> InMemoryDonorStore {
        let store = InMemoryDonorStore::new();
        store.insert_user(user_id(), "WubWoofWolf", supporter()).await;
        store
    }

    #[tokio::test]
    async fn finds_users_by_id_and_username() {
        let store = seeded().await;

        let by_id = store
            .find_account(&UserIdentifier::Id(user_id()))
            .await
            .unwrap()
            .unwrap();
        let by_name = store
            .find_account(&UserIdentifier::Username("WubWoofWolf".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(by_id.snapshot, supporter());
        assert_eq!(by_name.user_id, user_id());
        assert!(store
            .find_account(&UserIdentifier::Username("nobody".to_string()))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn commit_writes_everything() {
        let store = seeded().await;

        let result = store.commit(commit("TXN-1", supporter())).await.unwrap();

        assert_eq!(result, CommitResult::Committed);
        assert_eq!(store.snapshot_of(user_id()).await.unwrap(), premium());
        assert!(store
            .already_processed(&TransactionId::new("TXN-1").unwrap())
            .await
            .unwrap());
        assert_eq!(
            store.recorded_notification("TXN-1").await.unwrap(),
            json!({ "txn_id": "TXN-1" })
        );
    }

    #[tokio::test]
    async fn recorded_transaction_blocks_second_commit() {
        let store = seeded().await;
        store.commit(commit("TXN-1", supporter())).await.unwrap();

        let result = store.commit(commit("TXN-1", premium())).await.unwrap();

        assert_eq!(result, CommitResult::DuplicateTransaction);
        assert_eq!(store.processed_count().await, 1);
    }

    #[tokio::test]
    async fn changed_entitlement_is_stale() {
        let store = seeded().await;
        store.commit(commit("TXN-1", supporter())).await.unwrap();

        let result = store.commit(commit("TXN-2", supporter())).await.unwrap();

        assert_eq!(result, CommitResult::StaleSnapshot);
        assert!(!store
            .already_processed(&TransactionId::new("TXN-2").unwrap())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn badge_edited_elsewhere_is_stale() {
        let store = seeded().await;
        let mut edited = supporter();
        edited.badge_ids.push(12);
        store.insert_user(user_id(), "WubWoofWolf", edited.clone()).await;

        let result = store.commit(commit("TXN-1", supporter())).await.unwrap();

        assert_eq!(result, CommitResult::StaleSnapshot);
        assert_eq!(store.snapshot_of(user_id()).await.unwrap(), edited);
    }

    #[tokio::test]
    async fn missing_user_is_an_error() {
        let store = InMemoryDonorStore::new();

        let err = store.commit(commit("TXN-1", supporter())).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
