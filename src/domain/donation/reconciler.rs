//! Entitlement reconciliation.
//!
//! Pure, synchronous decision logic: given the user's current snapshot and a
//! paid donation, compute the replacement snapshot. No I/O happens here; the
//! caller owns idempotency checks, persistence and notifications.
//!
//! ## Steps
//!
//! 1. Verify the charged amount against [`price_of`].
//! 2. Take the remaining time (zero if lapsed).
//! 3. Convert remaining time across tiers on upgrade or downgrade.
//! 4. Add the purchased months and set the tier's privilege bits.
//! 5. Clamp the new expiry to `i32::MAX`.
//! 6. Apply queued badge changes.

use super::{
    apply_changes, convert_time_value, months_to_seconds, price_of, round_cents, BadgeChange,
    DonationIntent, DonorTier, EntitlementSnapshot, Privileges, ReconciliationOutcome, Rejection,
    RejectionReason,
};
use crate::domain::foundation::Timestamp;

/// Largest expiry the user store can hold.
pub const MAX_EXPIRE_AT: i64 = i32::MAX as i64;

/// Reconciles one donation against `current`.
pub fn reconcile(
    current: &EntitlementSnapshot,
    intent: &DonationIntent,
    now: Timestamp,
) -> ReconciliationOutcome {
    let tier = intent.tier();

    let expected = price_of(tier, intent.months());
    let charged = round_cents(intent.charged_amount());
    if expected != charged {
        return ReconciliationOutcome::Rejected(Rejection::new(
            RejectionReason::InvalidAmount,
            format!(
                "{} month(s) of {} costs {}, charged {}",
                intent.months(),
                tier,
                expected,
                charged
            ),
        ));
    }

    let mut remaining = current.remaining_secs(now) as f64;
    let mut privileges = current.privileges;
    let mut changes: Vec<BadgeChange> = Vec::new();

    match tier {
        DonorTier::Premium if current.privileges.is_supporter_only() => {
            remaining = convert_time_value(remaining, DonorTier::Supporter, DonorTier::Premium);
            changes.push(BadgeChange::delete(DonorTier::Supporter.badge_id()));
        }
        DonorTier::Supporter if current.privileges.has_premium() => {
            remaining = convert_time_value(remaining, DonorTier::Premium, DonorTier::Supporter);
            privileges = privileges.without(Privileges::PREMIUM);
            changes.push(BadgeChange::delete(DonorTier::Premium.badge_id()));
        }
        _ => {}
    }

    remaining += months_to_seconds(intent.months()) as f64;
    privileges = privileges.union(tier.granted_privileges());
    if !current.has_badge(tier.badge_id()) {
        changes.push(BadgeChange::insert(tier.badge_id()));
    }

    let new_expire_at = (now.as_unix_secs() as f64 + remaining)
        .floor()
        .min(MAX_EXPIRE_AT as f64) as i64;

    let badge_ids = apply_changes(&current.badge_ids, &changes);

    ReconciliationOutcome::Granted {
        new_snapshot: EntitlementSnapshot::new(privileges, new_expire_at, badge_ids),
        applied_months: intent.months(),
    }
}
