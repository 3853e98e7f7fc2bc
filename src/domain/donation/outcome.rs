//! Reconciliation outcomes and the rejection taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::EntitlementSnapshot;

/// Why a notification did not grant anything.
///
/// Every reason is recoverable: the notification is acknowledged to the
/// processor and the rejection is reported to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    InvalidTier,
    InvalidAmount,
    UserNotFound,
    AmbiguousOrMissingUserIdentity,
    PaymentIncomplete,
    UnsupportedCurrency,
    BusinessAccountMismatch,
    DuplicateTransaction,
    /// The processor did not confirm the notification, or it is malformed.
    InvalidNotification,
}

impl RejectionReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::InvalidTier => "INVALID_TIER",
            RejectionReason::InvalidAmount => "INVALID_AMOUNT",
            RejectionReason::UserNotFound => "USER_NOT_FOUND",
            RejectionReason::AmbiguousOrMissingUserIdentity => "AMBIGUOUS_OR_MISSING_USER_IDENTITY",
            RejectionReason::PaymentIncomplete => "PAYMENT_INCOMPLETE",
            RejectionReason::UnsupportedCurrency => "UNSUPPORTED_CURRENCY",
            RejectionReason::BusinessAccountMismatch => "BUSINESS_ACCOUNT_MISMATCH",
            RejectionReason::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            RejectionReason::InvalidNotification => "INVALID_NOTIFICATION",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A typed rejection plus human-readable details for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{reason}: {details}")]
pub struct Rejection {
    pub reason: RejectionReason,
    pub details: String,
}

impl Rejection {
    pub fn new(reason: RejectionReason, details: impl Into<String>) -> Self {
        Self {
            reason,
            details: details.into(),
        }
    }
}

/// Result of reconciling one donation against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    Granted {
        new_snapshot: EntitlementSnapshot,
        applied_months: u32,
    },
    Rejected(Rejection),
}

impl ReconciliationOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, ReconciliationOutcome::Granted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_displays_code_and_details() {
        let rejection = Rejection::new(RejectionReason::InvalidAmount, "expected 5.00, got 4.99");
        assert_eq!(
            rejection.to_string(),
            "INVALID_AMOUNT: expected 5.00, got 4.99"
        );
    }

    #[test]
    fn reason_serializes_as_code() {
        let json = serde_json::to_string(&RejectionReason::DuplicateTransaction).unwrap();
        assert_eq!(json, "\"DUPLICATE_TRANSACTION\"");
    }
}
