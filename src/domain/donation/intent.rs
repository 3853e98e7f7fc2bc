//! Donation intent - a validated, paid purchase ready for reconciliation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DonorTier;
use crate::domain::foundation::{TransactionId, UserId, ValidationError};

/// Longest duration accepted in one purchase.
pub const MAX_DONATION_MONTHS: u32 = 120;

/// How a notification names the user it pays for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum UserIdentifier {
    Id(UserId),
    Username(String),
}

impl fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserIdentifier::Id(id) => write!(f, "id={}", id),
            UserIdentifier::Username(name) => write!(f, "username={}", name),
        }
    }
}

/// One paid donation, built from verified notification fields.
///
/// Fields are private so `months` can never be zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationIntent {
    tier: DonorTier,
    months: u32,
    charged_amount: Decimal,
    currency: String,
    transaction_id: TransactionId,
    user: UserIdentifier,
}

impl DonationIntent {
    /// Creates an intent, rejecting durations outside `1..=MAX_DONATION_MONTHS`.
    pub fn new(
        tier: DonorTier,
        months: u32,
        charged_amount: Decimal,
        currency: impl Into<String>,
        transaction_id: TransactionId,
        user: UserIdentifier,
    ) -> Result<Self, ValidationError> {
        if months == 0 || months > MAX_DONATION_MONTHS {
            return Err(ValidationError::out_of_range(
                "months",
                1,
                i64::from(MAX_DONATION_MONTHS),
                i64::from(months),
            ));
        }
        Ok(Self {
            tier,
            months,
            charged_amount,
            currency: currency.into(),
            transaction_id,
            user,
        })
    }

    pub fn tier(&self) -> DonorTier {
        self.tier
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    pub fn charged_amount(&self) -> Decimal {
        self.charged_amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn user(&self) -> &UserIdentifier {
        &self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn() -> TransactionId {
        TransactionId::new("TXN-1").unwrap()
    }

    #[test]
    fn zero_months_is_rejected() {
        let result = DonationIntent::new(
            DonorTier::Premium,
            0,
            Decimal::ZERO,
            "EUR",
            txn(),
            UserIdentifier::Username("cookiezi".to_string()),
        );
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn overly_long_duration_is_rejected() {
        let result = DonationIntent::new(
            DonorTier::Supporter,
            MAX_DONATION_MONTHS + 1,
            Decimal::ZERO,
            "EUR",
            txn(),
            UserIdentifier::Id(UserId::new(3).unwrap()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn valid_intent_exposes_fields() {
        let intent = DonationIntent::new(
            DonorTier::Premium,
            2,
            Decimal::new(1000, 2),
            "EUR",
            txn(),
            UserIdentifier::Id(UserId::new(1001).unwrap()),
        )
        .unwrap();

        assert_eq!(intent.tier(), DonorTier::Premium);
        assert_eq!(intent.months(), 2);
        assert_eq!(intent.currency(), "EUR");
        assert_eq!(intent.transaction_id().as_str(), "TXN-1");
    }

    #[test]
    fn user_identifier_displays_kind() {
        let by_name = UserIdentifier::Username("rrtyui".to_string());
        assert_eq!(by_name.to_string(), "username=rrtyui");
    }
}
