//! PostgreSQL implementation of UserRepository.
//!
//! Reads a user's privileges, donor expiry and badge list (in insertion
//! order) in one statement, so all three come from the same snapshot.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::donation::{EntitlementSnapshot, Privileges, UserIdentifier};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{DonorAccount, UserRepository};

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user's entitlement columns.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    privileges: i32,
    donor_expire: i64,
    badge_ids: Vec<i32>,
}

impl UserRow {
    fn into_account(self) -> Result<DonorAccount, DomainError> {
        let user_id = UserId::new(self.id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
        })?;

        Ok(DonorAccount {
            user_id,
            username: self.username,
            snapshot: EntitlementSnapshot::new(
                privileges_from_column(self.privileges),
                self.donor_expire,
                self.badge_ids,
            ),
        })
    }
}

/// The `privileges` column is a signed 32-bit bitmask.
pub(crate) fn privileges_from_column(value: i32) -> Privileges {
    Privileges::from_bits(value as u32)
}

pub(crate) fn privileges_to_column(privileges: Privileges) -> i32 {
    privileges.bits() as i32
}

const SELECT_ACCOUNT: &str = r#"
    SELECT u.id, u.username, u.privileges, u.donor_expire,
           ARRAY(SELECT b.badge FROM user_badges b WHERE b.user_id = u.id ORDER BY b.id) AS badge_ids
    FROM users u
"#;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_account(
        &self,
        identifier: &UserIdentifier,
    ) -> Result<Option<DonorAccount>, DomainError> {
        let sql = match identifier {
            UserIdentifier::Id(_) => format!("{SELECT_ACCOUNT} WHERE u.id = $1"),
            UserIdentifier::Username(_) => format!("{SELECT_ACCOUNT} WHERE u.username = $1"),
        };
        let query = sqlx::query_as::<_, UserRow>(&sql);
        let query = match identifier {
            UserIdentifier::Id(id) => query.bind(id.as_i64()),
            UserIdentifier::Username(name) => query.bind(name.clone()),
        };

        let row = query.fetch_optional(&self.pool).await.map_err(|e| {
            DomainError::database(format!("Failed to fetch user {}: {}", identifier, e))
        })?;

        row.map(UserRow::into_account).transpose()
    }
}
