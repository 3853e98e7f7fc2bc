//! Donation pricing.
//!
//! Prices gate financial acceptance of a payment: the charged amount must
//! equal `price_of(tier, months)` to the cent, so these formulas are fixed
//! business constants and must stay bit-for-bit reproducible.

use rust_decimal::{Decimal, RoundingStrategy};

use super::DonorTier;

/// Flat monthly price of the Premium tier.
pub const PREMIUM_MONTHLY_PRICE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Length of one purchased month.
pub const SECONDS_PER_MONTH: i64 = 30 * 86_400;

/// Price of `months` of `tier`, rounded to cents.
///
/// - Supporter: `round((months * 30 * 0.2) ^ 0.72, 2)`
/// - Premium: `round(months * PREMIUM_MONTHLY_PRICE, 2)`
///
/// `months` must be positive; validating that is the caller's job.
pub fn price_of(tier: DonorTier, months: u32) -> Decimal {
    match tier {
        DonorTier::Supporter => {
            let raw = (f64::from(months) * 30.0 * 0.2).powf(0.72);
            round_cents(Decimal::from_f64_retain(raw).unwrap_or_default())
        }
        DonorTier::Premium => round_cents(Decimal::from(months) * PREMIUM_MONTHLY_PRICE),
    }
}

/// Rounds to two decimal places, half-to-even.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Duration of a purchase in seconds.
pub fn months_to_seconds(months: u32) -> i64 {
    i64::from(months) * SECONDS_PER_MONTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cents(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    #[test]
    fn supporter_prices_match_reference_table() {
        assert_eq!(price_of(DonorTier::Supporter, 1), cents(363));
        assert_eq!(price_of(DonorTier::Supporter, 2), cents(598));
        assert_eq!(price_of(DonorTier::Supporter, 3), cents(801));
        assert_eq!(price_of(DonorTier::Supporter, 6), cents(1320));
        assert_eq!(price_of(DonorTier::Supporter, 12), cents(2174));
        assert_eq!(price_of(DonorTier::Supporter, 24), cents(3581));
    }

    #[test]
    fn premium_is_flat_per_month() {
        assert_eq!(price_of(DonorTier::Premium, 1), cents(500));
        assert_eq!(price_of(DonorTier::Premium, 12), cents(6000));
    }

    #[test]
    fn prices_carry_two_decimal_places() {
        assert_eq!(price_of(DonorTier::Premium, 1).scale(), 2);
        assert!(price_of(DonorTier::Supporter, 7).scale() <= 2);
    }

    #[test]
    fn round_cents_uses_half_to_even() {
        assert_eq!(round_cents(Decimal::new(1005, 3)), cents(100));
        assert_eq!(round_cents(Decimal::new(1015, 3)), cents(102));
    }

    #[test]
    fn months_convert_to_thirty_day_blocks() {
        assert_eq!(months_to_seconds(1), 2_592_000);
        assert_eq!(months_to_seconds(12), 31_104_000);
    }

    proptest! {
        #[test]
        fn supporter_price_is_monotonic(months in 1u32..=240) {
            let this = price_of(DonorTier::Supporter, months);
            let next = price_of(DonorTier::Supporter, months + 1);
            prop_assert!(this <= next);
        }

        #[test]
        fn premium_price_is_monotonic(months in 1u32..=240) {
            prop_assert!(
                price_of(DonorTier::Premium, months) <= price_of(DonorTier::Premium, months + 1)
            );
        }
    }
}
