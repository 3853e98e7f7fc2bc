//! Donor tier definitions.
//!
//! The two donation levels a user can buy. Each tier owns exactly one
//! privilege bit and one cosmetic badge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Privileges;

/// Badge shown on profiles of Supporter donors.
pub const SUPPORTER_BADGE_ID: i32 = 36;

/// Badge shown on profiles of Premium donors.
pub const PREMIUM_BADGE_ID: i32 = 59;

/// Donation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonorTier {
    /// Entry tier, priced on a concave curve over the duration.
    Supporter,

    /// Upper tier, flat monthly rate. Implies Supporter.
    Premium,
}

impl DonorTier {
    /// All bits granted when this tier is purchased.
    ///
    /// Premium is a superset privilege, so it carries the Supporter bit too.
    pub fn granted_privileges(&self) -> Privileges {
        match self {
            DonorTier::Supporter => Privileges::SUPPORTER,
            DonorTier::Premium => Privileges::SUPPORTER.union(Privileges::PREMIUM),
        }
    }

    /// The badge displayed for this tier.
    pub fn badge_id(&self) -> i32 {
        match self {
            DonorTier::Supporter => SUPPORTER_BADGE_ID,
            DonorTier::Premium => PREMIUM_BADGE_ID,
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            DonorTier::Supporter => "Supporter",
            DonorTier::Premium => "Premium",
        }
    }
}

impl fmt::Display for DonorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Raised when a tier name is not one of the two known tiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for DonorTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supporter" => Ok(DonorTier::Supporter),
            "premium" => Ok(DonorTier::Premium),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_grants_supporter_bit_too() {
        let granted = DonorTier::Premium.granted_privileges();
        assert!(granted.has_supporter());
        assert!(granted.has_premium());
    }

    #[test]
    fn supporter_grants_only_its_own_bit() {
        let granted = DonorTier::Supporter.granted_privileges();
        assert!(granted.has_supporter());
        assert!(!granted.has_premium());
    }

    #[test]
    fn tiers_have_distinct_badges() {
        assert_ne!(DonorTier::Supporter.badge_id(), DonorTier::Premium.badge_id());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Supporter".parse::<DonorTier>().unwrap(), DonorTier::Supporter);
        assert_eq!(" PREMIUM ".parse::<DonorTier>().unwrap(), DonorTier::Premium);
    }

    #[test]
    fn rejects_unknown_tier_names() {
        let err = "platinum".parse::<DonorTier>().unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized tier: platinum");
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&DonorTier::Premium).unwrap();
        assert_eq!(json, "\"premium\"");
    }
}
