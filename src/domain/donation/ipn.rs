//! Payment notification parsing and boundary validation.
//!
//! The processor posts a form-encoded body. This module gives it a typed
//! shape and turns it into a [`DonationIntent`], or a typed [`Rejection`]
//! naming the first check that failed.
//!
//! ## Fields
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `txn_id` | processor transaction id |
//! | `payment_status` | must be `Completed` |
//! | `mc_gross` / `mc_currency` | charged amount and currency |
//! | `business` (or `receiver_email`) | account that received the money |
//! | `option_selection1` | tier name |
//! | `option_selection2` | duration, `"3"` or `"3 months"` |
//! | `custom` | user identity: `id=<n>`, `username=<name>`, bare id or bare name |

use rust_decimal::Decimal;
use std::str::FromStr;

use super::{DonationIntent, DonorTier, Rejection, RejectionReason, UserIdentifier};
use crate::domain::foundation::{TransactionId, UserId};

/// Acceptance rules taken from configuration.
#[derive(Debug, Clone)]
pub struct IpnPolicy {
    pub business_email: String,
    pub accepted_currencies: Vec<String>,
}

impl IpnPolicy {
    fn accepts_currency(&self, currency: &str) -> bool {
        self.accepted_currencies
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(currency))
    }
}

/// A payment notification as received, with the fields we read pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpnNotification {
    pub txn_id: Option<String>,
    pub payment_status: Option<String>,
    pub gross: Option<String>,
    pub currency: Option<String>,
    pub business: Option<String>,
    pub tier: Option<String>,
    pub duration: Option<String>,
    pub custom: Option<String>,
    /// Every field in arrival order, for postback and the transaction log.
    pub fields: Vec<(String, String)>,
}

impl IpnNotification {
    pub fn from_pairs(fields: Vec<(String, String)>) -> Self {
        let get = |name: &str| -> Option<String> {
            fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            txn_id: get("txn_id"),
            payment_status: get("payment_status"),
            gross: get("mc_gross"),
            currency: get("mc_currency"),
            business: get("business").or_else(|| get("receiver_email")),
            tier: get("option_selection1"),
            duration: get("option_selection2"),
            custom: get("custom"),
            fields,
        }
    }

    /// The raw fields as a JSON object, for the transaction log.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Validates the notification and builds the donation it pays for.
    pub fn into_intent(&self, policy: &IpnPolicy) -> Result<DonationIntent, Rejection> {
        let status = self.payment_status.as_deref().unwrap_or("");
        if !status.eq_ignore_ascii_case("Completed") {
            return Err(Rejection::new(
                RejectionReason::PaymentIncomplete,
                format!("payment_status is '{}'", status),
            ));
        }

        let business = self.business.as_deref().unwrap_or("");
        if !business.eq_ignore_ascii_case(policy.business_email.trim()) {
            return Err(Rejection::new(
                RejectionReason::BusinessAccountMismatch,
                format!("payment sent to '{}'", business),
            ));
        }

        let currency = self.currency.as_deref().unwrap_or("");
        if !policy.accepts_currency(currency) {
            return Err(Rejection::new(
                RejectionReason::UnsupportedCurrency,
                format!("currency '{}' is not accepted", currency),
            ));
        }

        let tier_name = self.tier.as_deref().unwrap_or("");
        let tier = DonorTier::from_str(tier_name)
            .map_err(|e| Rejection::new(RejectionReason::InvalidTier, e.to_string()))?;

        let months = self
            .duration
            .as_deref()
            .and_then(parse_months)
            .ok_or_else(|| {
                Rejection::new(
                    RejectionReason::InvalidAmount,
                    format!("unparseable duration '{}'", self.duration.as_deref().unwrap_or("")),
                )
            })?;

        let gross = self.gross.as_deref().unwrap_or("");
        let amount = Decimal::from_str(gross).map_err(|_| {
            Rejection::new(
                RejectionReason::InvalidAmount,
                format!("unparseable amount '{}'", gross),
            )
        })?;

        let user = self
            .custom
            .as_deref()
            .and_then(parse_user_identifier)
            .ok_or_else(|| {
                Rejection::new(
                    RejectionReason::AmbiguousOrMissingUserIdentity,
                    format!("custom field is '{}'", self.custom.as_deref().unwrap_or("")),
                )
            })?;

        let transaction_id = TransactionId::new(self.txn_id.clone().unwrap_or_default())
            .map_err(|e| Rejection::new(RejectionReason::InvalidNotification, e.to_string()))?;

        DonationIntent::new(tier, months, amount, currency.to_ascii_uppercase(), transaction_id, user)
            .map_err(|e| Rejection::new(RejectionReason::InvalidAmount, e.to_string()))
    }
}

/// Reads the leading integer of `"3"` or `"3 months"`.
fn parse_months(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse::<u32>().ok()
}

/// Parses the `custom` field into a user identity.
///
/// Returns `None` when the value is blank, names an unknown key, or
/// carries more than one identity.
fn parse_user_identifier(raw: &str) -> Option<UserIdentifier> {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains('&') {
        return None;
    }

    match raw.split_once('=') {
        Some(("id", value)) | Some(("user_id", value)) => {
            value.parse::<UserId>().ok().map(UserIdentifier::Id)
        }
        Some(("username", value)) => {
            let name = value.trim();
            (!name.is_empty()).then(|| UserIdentifier::Username(name.to_string()))
        }
        Some(_) => None,
        None if raw.bytes().all(|b| b.is_ascii_digit()) => {
            raw.parse::<UserId>().ok().map(UserIdentifier::Id)
        }
        None => Some(UserIdentifier::Username(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> IpnPolicy {
        IpnPolicy {
            business_email: "donations@example.org".to_string(),
            accepted_currencies: vec!["EUR".to_string()],
        }
    }

    fn fields(overrides: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut base: Vec<(String, String)> = [
            ("txn_id", "5TY05013RG002845M"),
            ("payment_status", "Completed"),
            ("mc_gross", "5.00"),
            ("mc_currency", "EUR"),
            ("business", "donations@example.org"),
            ("option_selection1", "premium"),
            ("option_selection2", "1 month"),
            ("custom", "id=1001"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for (key, value) in overrides {
            match base.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => base.push((key.to_string(), value.to_string())),
            }
        }
        base
    }

    fn reject(overrides: &[(&str, &str)]) -> RejectionReason {
        IpnNotification::from_pairs(fields(overrides))
            .into_intent(&policy())
            .unwrap_err()
            .reason
    }

    #[test]
    fn valid_notification_builds_intent() {
        let intent = IpnNotification::from_pairs(fields(&[]))
            .into_intent(&policy())
            .unwrap();

        assert_eq!(intent.tier(), DonorTier::Premium);
        assert_eq!(intent.months(), 1);
        assert_eq!(intent.charged_amount(), Decimal::new(500, 2));
        assert_eq!(intent.transaction_id().as_str(), "5TY05013RG002845M");
        assert_eq!(intent.user(), &UserIdentifier::Id(UserId::new(1001).unwrap()));
    }

    #[test]
    fn pending_payment_is_rejected() {
        assert_eq!(
            reject(&[("payment_status", "Pending")]),
            RejectionReason::PaymentIncomplete
        );
    }

    #[test]
    fn foreign_business_account_is_rejected() {
        assert_eq!(
            reject(&[("business", "someone@else.com")]),
            RejectionReason::BusinessAccountMismatch
        );
    }

    #[test]
    fn receiver_email_is_used_when_business_missing() {
        let mut raw = fields(&[("receiver_email", "Donations@Example.org")]);
        raw.retain(|(k, _)| k != "business");

        let result = IpnNotification::from_pairs(raw).into_intent(&policy());

        assert!(result.is_ok());
    }

    #[test]
    fn unsupported_currency_is_rejected() {
        assert_eq!(
            reject(&[("mc_currency", "JPY")]),
            RejectionReason::UnsupportedCurrency
        );
    }

    #[test]
    fn unknown_tier_is_rejected() {
        assert_eq!(
            reject(&[("option_selection1", "gold")]),
            RejectionReason::InvalidTier
        );
    }

    #[test]
    fn unparseable_or_zero_duration_is_rejected() {
        assert_eq!(
            reject(&[("option_selection2", "forever")]),
            RejectionReason::InvalidAmount
        );
        assert_eq!(
            reject(&[("option_selection2", "0 months")]),
            RejectionReason::InvalidAmount
        );
        assert_eq!(
            reject(&[("option_selection2", "-2")]),
            RejectionReason::InvalidAmount
        );
    }

    #[test]
    fn unparseable_amount_is_rejected() {
        assert_eq!(reject(&[("mc_gross", "five")]), RejectionReason::InvalidAmount);
    }

    #[test]
    fn identity_forms_are_recognized() {
        assert_eq!(
            parse_user_identifier("username=mrekk"),
            Some(UserIdentifier::Username("mrekk".to_string()))
        );
        assert_eq!(
            parse_user_identifier("77"),
            Some(UserIdentifier::Id(UserId::new(77).unwrap()))
        );
        assert_eq!(
            parse_user_identifier("whitecat"),
            Some(UserIdentifier::Username("whitecat".to_string()))
        );
    }

    #[test]
    fn ambiguous_or_missing_identity_is_rejected() {
        assert_eq!(reject(&[("custom", "")]), RejectionReason::AmbiguousOrMissingUserIdentity);
        assert_eq!(
            reject(&[("custom", "id=1&username=x")]),
            RejectionReason::AmbiguousOrMissingUserIdentity
        );
        assert_eq!(
            reject(&[("custom", "email=x@y.z")]),
            RejectionReason::AmbiguousOrMissingUserIdentity
        );
        assert_eq!(
            reject(&[("custom", "id=abc")]),
            RejectionReason::AmbiguousOrMissingUserIdentity
        );
    }

    #[test]
    fn missing_transaction_id_is_rejected() {
        let mut raw = fields(&[]);
        raw.retain(|(k, _)| k != "txn_id");

        let reason = IpnNotification::from_pairs(raw)
            .into_intent(&policy())
            .unwrap_err()
            .reason;

        assert_eq!(reason, RejectionReason::InvalidNotification);
    }

    #[test]
    fn to_json_preserves_all_fields() {
        let json = IpnNotification::from_pairs(fields(&[("ipn_track_id", "abc")])).to_json();
        assert_eq!(json["ipn_track_id"], "abc");
        assert_eq!(json["mc_gross"], "5.00");
    }
}
