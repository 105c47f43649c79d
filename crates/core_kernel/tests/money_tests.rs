//! Comprehensive unit tests for the Money module
//!
//! Tests cover money creation, arithmetic operations, equal-share
//! allocation, currency handling, and edge cases the split engine
//! depends on.

use core_kernel::{Currency, Money, MoneyError, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::INR);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::INR);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::INR);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_paise_correctly() {
        let m = Money::from_minor(10050, Currency::INR);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn test_negative_amount_creation() {
        let m = Money::new(dec!(-100.00), Currency::USD);
        assert!(m.is_negative());
        assert_eq!(m.amount(), dec!(-100.00));
    }

    #[test]
    fn test_default_currency_is_inr() {
        assert_eq!(Currency::default(), Currency::INR);
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_is_zero_true_for_zero_amount() {
        let m = Money::zero(Currency::INR);
        assert!(m.is_zero());
    }

    #[test]
    fn test_is_zero_false_for_one_cent() {
        let m = Money::new(dec!(0.01), Currency::INR);
        assert!(!m.is_zero());
    }

    #[test]
    fn test_is_positive_false_for_zero() {
        let m = Money::zero(Currency::INR);
        assert!(!m.is_positive());
    }

    #[test]
    fn test_is_negative_false_for_zero() {
        let m = Money::zero(Currency::INR);
        assert!(!m.is_negative());
    }

    #[test]
    fn test_abs_flips_sign() {
        let m = Money::new(dec!(-42.17), Currency::INR);
        assert_eq!(m.abs().amount(), dec!(42.17));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::new(dec!(100.00), Currency::INR);
        let b = Money::new(dec!(50.00), Currency::INR);
        let result = a.checked_add(&b).unwrap();
        assert_eq!(result.amount(), dec!(150.00));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(50.00), Currency::EUR);
        let result = a.checked_add(&b);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_checked_sub_can_go_negative() {
        let a = Money::new(dec!(30.00), Currency::INR);
        let b = Money::new(dec!(100.00), Currency::INR);
        let result = a.checked_sub(&b).unwrap();
        assert_eq!(result.amount(), dec!(-70.00));
    }

    #[test]
    fn test_neg_operator() {
        let m = Money::new(dec!(25.00), Currency::INR);
        assert_eq!((-m).amount(), dec!(-25.00));
    }

    #[test]
    fn test_divide_by_zero_fails() {
        let m = Money::new(dec!(100.00), Currency::INR);
        assert!(matches!(
            m.divide(Decimal::ZERO),
            Err(MoneyError::DivisionByZero)
        ));
    }
}

mod allocation {
    use super::*;

    #[test]
    fn test_allocate_divisible_amount_gives_equal_parts() {
        let m = Money::new(dec!(90.00), Currency::INR);
        let parts = m.allocate(3).unwrap();
        assert!(parts.iter().all(|p| p.amount() == dec!(30.00)));
    }

    #[test]
    fn test_allocate_non_divisible_amount_favors_leading_parts() {
        // 10.00 over three people: the leftover cent goes to the first share.
        let m = Money::new(dec!(10.00), Currency::INR);
        let parts = m.allocate(3).unwrap();

        let amounts: Vec<Decimal> = parts.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![dec!(3.34), dec!(3.33), dec!(3.33)]);
    }

    #[test]
    fn test_allocate_single_part_returns_whole_amount() {
        let m = Money::new(dec!(55.55), Currency::USD);
        let parts = m.allocate(1).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], m);
    }

    #[test]
    fn test_allocate_zero_parts_fails() {
        let m = Money::new(dec!(10.00), Currency::INR);
        assert!(matches!(m.allocate(0), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_allocate_conserves_total_to_the_cent() {
        let m = Money::new(dec!(100.01), Currency::INR);
        let parts = m.allocate(7).unwrap();
        let total: Decimal = parts.iter().map(|p| p.amount()).sum();
        assert_eq!(total, dec!(100.01));
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_percentage_share_is_exact() {
        let bill = Money::new(dec!(90.00), Currency::INR);
        let share = Rate::from_percentage(dec!(33.33)).apply(&bill);
        assert_eq!(share.amount(), dec!(29.997));
    }

    #[test]
    fn test_rate_round_trip() {
        let rate = Rate::from_percentage(dec!(12.5));
        assert_eq!(rate.as_percentage(), dec!(12.5));
        assert_eq!(rate.as_decimal(), dec!(0.125));
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_round_to_currency_uses_bankers_rounding() {
        // Matches the aggregation rule: midpoints round to even.
        let down = Money::new(dec!(1.125), Currency::INR);
        assert_eq!(down.round_to_currency().amount(), dec!(1.12));

        let up = Money::new(dec!(1.135), Currency::INR);
        assert_eq!(up.round_to_currency().amount(), dec!(1.14));
    }

    #[test]
    fn test_display_uses_currency_symbol() {
        let m = Money::new(dec!(10.50), Currency::USD);
        assert_eq!(m.to_string(), "$ 10.50");
    }
}
