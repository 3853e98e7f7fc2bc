//! PostgreSQL implementation of EntitlementStore and ProcessedTransactionStore.
//!
//! The `notifications` table is the transaction log. Its unique
//! `transaction_id` is what makes a commit idempotent.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::user_repository::privileges_to_column;
use crate::domain::foundation::{DomainError, TransactionId};
use crate::ports::{CommitResult, EntitlementCommit, EntitlementStore, ProcessedTransactionStore};

/// PostgreSQL implementation of the write-side storage ports.
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Effect of one guarded statement of a commit, in execution order.
#[derive(Debug)]
enum GuardCheck<'a> {
    /// `INSERT ... ON CONFLICT DO NOTHING` into the transaction log.
    Recorded { rows: u64, enforce_unique: bool },
    /// `UPDATE users` guarded by the previous privileges and expiry.
    UserUpdated { rows: u64 },
    /// Badge list read back under the user's row lock.
    BadgesRead { current: &'a [i32], expected: &'a [i32] },
}

/// `Some` means the commit must roll back with that result.
fn abort_reason(check: GuardCheck<'_>) -> Option<CommitResult> {
    match check {
        GuardCheck::Recorded {
            rows: 0,
            enforce_unique: true,
        } => Some(CommitResult::DuplicateTransaction),
        GuardCheck::Recorded { .. } => None,
        GuardCheck::UserUpdated { rows: 0 } => Some(CommitResult::StaleSnapshot),
        GuardCheck::UserUpdated { .. } => None,
        GuardCheck::BadgesRead { current, expected } if current != expected => {
            Some(CommitResult::StaleSnapshot)
        }
        GuardCheck::BadgesRead { .. } => None,
    }
}

async fn abort(
    tx: Transaction<'_, Postgres>,
    result: CommitResult,
) -> Result<CommitResult, DomainError> {
    tx.rollback()
        .await
        .map_err(|e| DomainError::database(format!("Failed to roll back transaction: {}", e)))?;
    tracing::debug!(?result, "Entitlement commit rolled back");
    Ok(result)
}

#[async_trait]
impl ProcessedTransactionStore for PostgresEntitlementStore {
    async fn already_processed(&self, transaction_id: &TransactionId) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM notifications WHERE transaction_id = $1)
            "#,
        )
        .bind(transaction_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to check transaction: {}", e)))
    }
}

#[async_trait]
impl EntitlementStore for PostgresEntitlementStore {
    async fn commit(&self, commit: EntitlementCommit) -> Result<CommitResult, DomainError> {
        let user_id = commit.user_id.as_i64();
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to start transaction: {}", e))
        })?;

        let recorded = sqlx::query(
            r#"
            INSERT INTO notifications (transaction_id, notification)
            VALUES ($1, $2)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(commit.transaction_id.as_str())
        .bind(&commit.notification)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record notification: {}", e)))?;

        if let Some(result) = abort_reason(GuardCheck::Recorded {
            rows: recorded.rows_affected(),
            enforce_unique: commit.enforce_unique,
        }) {
            return abort(tx, result).await;
        }

        // Locks the user row until the transaction ends
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                privileges = $2,
                donor_expire = $3
            WHERE id = $1
              AND privileges = $4
              AND donor_expire = $5
            "#,
        )
        .bind(user_id)
        .bind(privileges_to_column(commit.next.privileges))
        .bind(commit.next.expire_at)
        .bind(privileges_to_column(commit.previous.privileges))
        .bind(commit.previous.expire_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update user: {}", e)))?;

        if let Some(result) = abort_reason(GuardCheck::UserUpdated {
            rows: updated.rows_affected(),
        }) {
            return abort(tx, result).await;
        }

        let current: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT badge
            FROM user_badges
            WHERE user_id = $1
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to read badges: {}", e)))?;

        if let Some(result) = abort_reason(GuardCheck::BadgesRead {
            current: &current,
            expected: &commit.previous.badge_ids,
        }) {
            return abort(tx, result).await;
        }

        sqlx::query("DELETE FROM user_badges WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to clear badges: {}", e)))?;

        for badge_id in &commit.next.badge_ids {
            sqlx::query("INSERT INTO user_badges (user_id, badge) VALUES ($1, $2)")
                .bind(user_id)
                .bind(badge_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database(format!("Failed to insert badge: {}", e)))?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(CommitResult::Committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::donation::{PREMIUM_BADGE_ID, SUPPORTER_BADGE_ID};

    #[test]
    fn new_transaction_proceeds() {
        let check = GuardCheck::Recorded {
            rows: 1,
            enforce_unique: true,
        };
        assert_eq!(abort_reason(check), None);
    }

    #[test]
    fn recorded_transaction_is_duplicate_when_enforced() {
        let check = GuardCheck::Recorded {
            rows: 0,
            enforce_unique: true,
        };
        assert_eq!(abort_reason(check), Some(CommitResult::DuplicateTransaction));
    }

    #[test]
    fn recorded_transaction_proceeds_when_not_enforced() {
        let check = GuardCheck::Recorded {
            rows: 0,
            enforce_unique: false,
        };
        assert_eq!(abort_reason(check), None);
    }

    #[test]
    fn unmatched_user_update_is_stale() {
        assert_eq!(
            abort_reason(GuardCheck::UserUpdated { rows: 0 }),
            Some(CommitResult::StaleSnapshot)
        );
        assert_eq!(abort_reason(GuardCheck::UserUpdated { rows: 1 }), None);
    }

    #[test]
    fn unchanged_badges_proceed() {
        let badges = [SUPPORTER_BADGE_ID, 12];
        let check = GuardCheck::BadgesRead {
            current: &badges,
            expected: &badges,
        };
        assert_eq!(abort_reason(check), None);
    }

    #[test]
    fn badge_added_since_read_is_stale() {
        let check = GuardCheck::BadgesRead {
            current: &[SUPPORTER_BADGE_ID, 12],
            expected: &[SUPPORTER_BADGE_ID],
        };
        assert_eq!(abort_reason(check), Some(CommitResult::StaleSnapshot));
    }

    #[test]
    fn reordered_badges_are_stale() {
        let check = GuardCheck::BadgesRead {
            current: &[PREMIUM_BADGE_ID, SUPPORTER_BADGE_ID],
            expected: &[SUPPORTER_BADGE_ID, PREMIUM_BADGE_ID],
        };
        assert_eq!(abort_reason(check), Some(CommitResult::StaleSnapshot));
    }
}
