//! Privilege bitmask.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user's privilege bits as stored on the user record.
///
/// Only the donor bits are interpreted here; all other bits are carried
/// through reconciliation untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Privileges(u32);

impl Privileges {
    /// Supporter donor bit.
    pub const SUPPORTER: Privileges = Privileges(1 << 2);

    /// Premium donor bit.
    pub const PREMIUM: Privileges = Privileges(1 << 23);

    /// Wraps raw bits read from storage.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits for storage.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Bitwise union of two masks.
    pub const fn union(self, other: Privileges) -> Privileges {
        Privileges(self.0 | other.0)
    }

    /// Clears every bit set in `other`.
    pub const fn without(self, other: Privileges) -> Privileges {
        Privileges(self.0 & !other.0)
    }

    /// True when all bits of `other` are set.
    pub const fn contains(&self, other: Privileges) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn has_supporter(&self) -> bool {
        self.contains(Privileges::SUPPORTER)
    }

    pub fn has_premium(&self) -> bool {
        self.contains(Privileges::PREMIUM)
    }

    /// Supporter bit set without the Premium bit.
    pub fn is_supporter_only(&self) -> bool {
        self.has_supporter() && !self.has_premium()
    }
}

impl fmt::Display for Privileges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
