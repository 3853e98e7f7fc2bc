//! Donation domain module.
//!
//! Turns a paid donation into a new donor entitlement.
//!
//! # Module Structure
//!
//! - `tier` - Supporter and Premium tiers, their bits and badges
//! - `privileges` - Privilege bitmask
//! - `pricing` - Price of a tier for a number of months
//! - `exchange` - Converting remaining time between tiers
//! - `badges` - Bounded badge list editing
//! - `snapshot` - A user's entitlement state
//! - `intent` - A validated donation
//! - `outcome` - Grant or typed rejection
//! - `reconciler` - The reconciliation decision
//! - `ipn` - Notification parsing and boundary validation
//! - `ipn_errors` - Infrastructure failures and their HTTP mapping

mod badges;
mod exchange;
mod intent;
mod ipn;
mod ipn_errors;
mod outcome;
mod pricing;
mod privileges;
mod reconciler;
mod snapshot;
mod tier;

pub use badges::{apply_changes, BadgeAction, BadgeChange, MAX_BADGES};
pub use exchange::{convert_time_value, exchange_rate};
pub use intent::{DonationIntent, UserIdentifier, MAX_DONATION_MONTHS};
pub use ipn::{IpnNotification, IpnPolicy};
pub use ipn_errors::IpnError;
pub use outcome::{ReconciliationOutcome, Rejection, RejectionReason};
pub use pricing::{
    months_to_seconds, price_of, round_cents, PREMIUM_MONTHLY_PRICE, SECONDS_PER_MONTH,
};
pub use privileges::Privileges;
pub use reconciler::{reconcile, MAX_EXPIRE_AT};
pub use snapshot::EntitlementSnapshot;
pub use tier::{DonorTier, UnknownTier, PREMIUM_BADGE_ID, SUPPORTER_BADGE_ID};
