//! Cross-tier time conversion.
//!
//! Remaining entitlement time on one tier is revalued into another tier's
//! time units using the ratio of the two tiers' one-month prices.

use rust_decimal::prelude::ToPrimitive;

use super::{price_of, DonorTier};

/// Ratio `price_of(to, 1) / price_of(from, 1)`.
pub fn exchange_rate(from: DonorTier, to: DonorTier) -> f64 {
    if from == to {
        return 1.0;
    }
    let from_price = price_of(from, 1).to_f64().unwrap_or(0.0);
    let to_price = price_of(to, 1).to_f64().unwrap_or(0.0);
    if from_price <= 0.0 {
        return 0.0;
    }
    to_price / from_price
}

/// Revalues `seconds` of `from` entitlement into seconds of `to`.
pub fn convert_time_value(seconds: f64, from: DonorTier, to: DonorTier) -> f64 {
    seconds * exchange_rate(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_tier_conversion_is_identity() {
        assert_eq!(convert_time_value(1234.5, DonorTier::Premium, DonorTier::Premium), 1234.5);
    }

    #[test]
    fn rate_is_ratio_of_monthly_prices() {
        let rate = exchange_rate(DonorTier::Supporter, DonorTier::Premium);
        assert!((rate - 5.00 / 3.63).abs() < 1e-12);
    }

    #[test]
    fn ten_supporter_days_revalue_into_premium_units() {
        let converted = convert_time_value(864_000.0, DonorTier::Supporter, DonorTier::Premium);
        assert_eq!(converted.floor(), 1_190_082.0);
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(convert_time_value(0.0, DonorTier::Premium, DonorTier::Supporter), 0.0);
    }

    proptest! {
        #[test]
        fn conversion_round_trips(seconds in 0.0f64..1.0e10) {
            let there = convert_time_value(seconds, DonorTier::Supporter, DonorTier::Premium);
            let back = convert_time_value(there, DonorTier::Premium, DonorTier::Supporter);
            prop_assert!((back - seconds).abs() <= 1e-6 * seconds.max(1.0));
        }
    }
}
