//! Property-based test generators
//!
//! Proptest strategies for generating random test data that maintains
//! ledger invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, Money, UserId};

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::INR),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
    ]
}

/// Strategy for generating positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for a set of signed cent balances that sum to exactly zero
///
/// The shape every group's net positions have by construction; the last
/// participant absorbs the negated sum of the others.
pub fn balanced_cents_strategy(participants: usize) -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(-100_000i64..100_000i64, participants.saturating_sub(1)).prop_map(
        |mut cents| {
            let sum: i64 = cents.iter().sum();
            cents.push(-sum);
            cents.into_iter().map(|c| Decimal::new(c, 2)).collect()
        },
    )
}

/// Strategy for percentage splits that sum to exactly 100
///
/// Weights are normalized to basis points; the last participant absorbs the
/// rounding remainder.
pub fn percentage_split_strategy(participants: usize) -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(1u32..1000u32, participants..=participants).prop_map(|weights| {
        let total: u64 = weights.iter().map(|w| *w as u64).sum();
        let mut basis_points: Vec<i64> = weights
            .iter()
            .map(|w| ((*w as u64 * 10_000) / total) as i64)
            .collect();
        let assigned: i64 = basis_points.iter().sum();
        if let Some(last) = basis_points.last_mut() {
            *last += 10_000 - assigned;
        }
        basis_points
            .into_iter()
            .map(|bp| Decimal::new(bp, 2))
            .collect()
    })
}

/// Strategy for a sorted set of distinct user ids
pub fn user_ids_strategy(count: usize) -> impl Strategy<Value = Vec<UserId>> {
    Just(()).prop_map(move |_| {
        let mut ids: Vec<UserId> = (0..count).map(|_| UserId::new()).collect();
        ids.sort();
        ids
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn balanced_cents_sum_to_zero(cents in (2usize..10).prop_flat_map(balanced_cents_strategy)) {
            let total: Decimal = cents.iter().sum();
            prop_assert_eq!(total, Decimal::ZERO);
        }

        #[test]
        fn percentage_splits_sum_to_one_hundred(
            percentages in (1usize..10).prop_flat_map(percentage_split_strategy)
        ) {
            let total: Decimal = percentages.iter().sum();
            prop_assert_eq!(total, Decimal::new(10_000, 2));
        }
    }
}
