//! Entitlement snapshot - the donor state owned by a user record.

use serde::{Deserialize, Serialize};

use super::Privileges;
use crate::domain::foundation::Timestamp;

/// A user's donor entitlement at one point in time.
///
/// Read before reconciliation and replaced as a whole afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntitlementSnapshot {
    /// Full privilege mask of the user.
    pub privileges: Privileges,

    /// Donor expiry, seconds since the Unix epoch.
    pub expire_at: i64,

    /// Displayed badges in display order.
    pub badge_ids: Vec<i32>,
}

impl EntitlementSnapshot {
    pub fn new(privileges: Privileges, expire_at: i64, badge_ids: Vec<i32>) -> Self {
        Self {
            privileges,
            expire_at,
            badge_ids,
        }
    }

    /// Seconds of entitlement left at `now`; zero once lapsed.
    pub fn remaining_secs(&self, now: Timestamp) -> i64 {
        let now = now.as_unix_secs();
        self.expire_at.max(now) - now
    }

    pub fn has_badge(&self, badge_id: i32) -> bool {
        self.badge_ids.contains(&badge_id)
    }
}
