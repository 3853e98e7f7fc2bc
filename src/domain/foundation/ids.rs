//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Numeric identifier of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a UserId, rejecting non-positive values.
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::invalid_format(
                "user_id",
                "must be a positive integer",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the raw integer id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::invalid_format("user_id", "not an integer"))?;
        Self::new(id)
    }
}

/// The payment processor's unique identifier for one transaction.
///
/// Used as the idempotency key: one transaction id is applied at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates a TransactionId, returning error if blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("txn_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_zero_and_negative() {
        assert!(UserId::new(0).is_err());
        assert!(UserId::new(-5).is_err());
        assert_eq!(UserId::new(1001).unwrap().as_i64(), 1001);
    }

    #[test]
    fn user_id_parses_from_string() {
        let id: UserId = " 42 ".parse().unwrap();
        assert_eq!(id.as_i64(), 42);
        assert!("abc".parse::<UserId>().is_err());
    }

    #[test]
    fn transaction_id_trims_and_rejects_blank() {
        assert!(TransactionId::new("   ").is_err());
        assert_eq!(TransactionId::new(" 8AB12 ").unwrap().as_str(), "8AB12");
    }

    #[test]
    fn transaction_id_serializes_transparently() {
        let id = TransactionId::new("61E67681CH3238416").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"61E67681CH3238416\"");
    }
}
