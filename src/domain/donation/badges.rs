//! Bounded badge list editing.

use serde::{Deserialize, Serialize};

/// Maximum number of badges a user can display.
pub const MAX_BADGES: usize = 6;

/// What to do with a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeAction {
    Insert,
    Delete,
}

/// One queued edit to a user's badge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeChange {
    pub action: BadgeAction,
    pub badge_id: i32,
}

impl BadgeChange {
    pub fn insert(badge_id: i32) -> Self {
        Self {
            action: BadgeAction::Insert,
            badge_id,
        }
    }

    pub fn delete(badge_id: i32) -> Self {
        Self {
            action: BadgeAction::Delete,
            badge_id,
        }
    }
}

/// Applies `changes` to `current` and returns the new ordered list.
///
/// Every delete takes effect before any insert, whatever order the changes
/// were queued in, so a freed slot is always available to a new badge.
/// Deletes remove in place; inserts append. Inserting a badge that is
/// already present is a no-op, as is inserting into a list that already
/// holds [`MAX_BADGES`] entries. A list that arrives over the cap is never
/// truncated, only prevented from growing.
pub fn apply_changes(current: &[i32], changes: &[BadgeChange]) -> Vec<i32> {
    let mut badges = current.to_vec();

    for change in changes.iter().filter(|c| c.action == BadgeAction::Delete) {
        badges.retain(|id| *id != change.badge_id);
    }

    for change in changes.iter().filter(|c| c.action == BadgeAction::Insert) {
        if badges.contains(&change.badge_id) {
            continue;
        }
        if badges.len() >= MAX_BADGES {
            tracing::warn!(
                badge_id = change.badge_id,
                badge_count = badges.len(),
                "Badge list is full, skipping insert"
            );
            continue;
        }
        badges.push(change.badge_id);
    }

    badges
}
