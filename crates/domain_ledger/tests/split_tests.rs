//! Apportioner tests
//!
//! Covers validation failures, per-policy share computation, and the
//! penny-conservation postcondition for every split policy.

use domain_ledger::split::{apportion, validate, SplitPolicy, SplitRequest};
use domain_ledger::LedgerError;

use core_kernel::{Currency, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn members(n: usize) -> Vec<UserId> {
    (0..n).map(|_| UserId::new()).collect()
}

fn owed_sum(shares: &[domain_ledger::ExpenseShare]) -> Decimal {
    shares.iter().map(|s| s.owed.amount()).sum()
}

fn paid_sum(shares: &[domain_ledger::ExpenseShare]) -> Decimal {
    shares.iter().map(|s| s.paid.amount()).sum()
}

mod validation {
    use super::*;

    #[test]
    fn test_zero_amount_rejected() {
        let members = members(2);
        let request = SplitRequest {
            amount: Decimal::ZERO,
            policy: SplitPolicy::Equal,
            paid_by: vec![],
            owed_by: vec![],
        };

        assert!(matches!(
            validate(&request, &members),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_pay_total_must_match_amount() {
        let members = members(3);
        let request = SplitRequest {
            amount: dec!(90.00),
            policy: SplitPolicy::Equal,
            paid_by: vec![(members[0], dec!(45.00)), (members[1], dec!(40.00))],
            owed_by: vec![],
        };

        assert!(matches!(
            validate(&request, &members),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_fixed_split_must_sum_to_amount() {
        let members = members(2);
        let request = SplitRequest {
            amount: dec!(100.00),
            policy: SplitPolicy::Fixed,
            paid_by: vec![(members[0], dec!(100.00))],
            owed_by: vec![(members[0], dec!(60.00)), (members[1], dec!(30.00))],
        };

        assert!(matches!(
            validate(&request, &members),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_percentages_must_sum_to_one_hundred() {
        let members = members(2);
        let request = SplitRequest {
            amount: dec!(100.00),
            policy: SplitPolicy::Percentage,
            paid_by: vec![(members[0], dec!(100.00))],
            owed_by: vec![(members[0], dec!(50.00)), (members[1], dec!(49.00))],
        };

        assert!(matches!(
            validate(&request, &members),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_user_in_split_data_rejected() {
        let members = members(2);
        let request = SplitRequest {
            amount: dec!(100.00),
            policy: SplitPolicy::Fixed,
            paid_by: vec![(members[0], dec!(100.00))],
            owed_by: vec![(UserId::new(), dec!(100.00))],
        };

        assert!(matches!(
            validate(&request, &members),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_payer_rejected() {
        let members = members(2);
        let request = SplitRequest {
            amount: dec!(100.00),
            policy: SplitPolicy::Equal,
            paid_by: vec![(members[0], dec!(50.00)), (members[0], dec!(50.00))],
            owed_by: vec![],
        };

        assert!(matches!(
            validate(&request, &members),
            Err(LedgerError::Validation(_))
        ));
    }
}

mod equal_policy {
    use super::*;

    #[test]
    fn test_ninety_over_three_members() {
        // Group {A, B, C}, bill 90.00 paid entirely by A: expenses are
        // A:(90, 30), B:(0, 30), C:(0, 30).
        let members = members(3);
        let request = SplitRequest {
            amount: dec!(90.00),
            policy: SplitPolicy::Equal,
            paid_by: vec![(members[0], dec!(90.00))],
            owed_by: vec![],
        };

        let shares = apportion(&request, Currency::INR, &members).unwrap();

        assert_eq!(shares[0].paid.amount(), dec!(90.00));
        assert_eq!(shares[0].owed.amount(), dec!(30.00));
        assert_eq!(shares[1].paid.amount(), Decimal::ZERO);
        assert_eq!(shares[1].owed.amount(), dec!(30.00));
        assert_eq!(shares[2].paid.amount(), Decimal::ZERO);
        assert_eq!(shares[2].owed.amount(), dec!(30.00));
    }

    #[test]
    fn test_ten_over_three_gives_extra_cent_to_first() {
        let members = members(3);
        let request = SplitRequest {
            amount: dec!(10.00),
            policy: SplitPolicy::Equal,
            paid_by: vec![(members[0], dec!(10.00))],
            owed_by: vec![],
        };

        let shares = apportion(&request, Currency::INR, &members).unwrap();
        let owed: Vec<Decimal> = shares.iter().map(|s| s.owed.amount()).collect();

        assert_eq!(owed, vec![dec!(3.34), dec!(3.33), dec!(3.33)]);
        assert_eq!(owed_sum(&shares), dec!(10.00));
    }

    #[test]
    fn test_named_participants_split_among_themselves() {
        let members = members(4);
        let request = SplitRequest {
            amount: dec!(30.00),
            policy: SplitPolicy::Equal,
            paid_by: vec![(members[3], dec!(30.00))],
            owed_by: vec![(members[0], Decimal::ZERO), (members[1], Decimal::ZERO)],
        };

        let shares = apportion(&request, Currency::INR, &members).unwrap();

        assert_eq!(shares[0].owed.amount(), dec!(15.00));
        assert_eq!(shares[1].owed.amount(), dec!(15.00));
        assert_eq!(shares[2].owed.amount(), Decimal::ZERO);
        assert_eq!(shares[3].owed.amount(), Decimal::ZERO);
    }

    #[test]
    fn test_payer_outside_participant_set_owes_nothing() {
        let members = members(3);
        let request = SplitRequest {
            amount: dec!(20.00),
            policy: SplitPolicy::Equal,
            paid_by: vec![(members[2], dec!(20.00))],
            owed_by: vec![(members[0], Decimal::ZERO), (members[1], Decimal::ZERO)],
        };

        let shares = apportion(&request, Currency::INR, &members).unwrap();

        assert_eq!(shares[2].paid.amount(), dec!(20.00));
        assert_eq!(shares[2].owed.amount(), Decimal::ZERO);
        assert_eq!(owed_sum(&shares), dec!(20.00));
    }
}

mod fixed_policy {
    use super::*;

    #[test]
    fn test_fixed_amounts_taken_verbatim() {
        let members = members(3);
        let request = SplitRequest {
            amount: dec!(100.00),
            policy: SplitPolicy::Fixed,
            paid_by: vec![(members[0], dec!(100.00))],
            owed_by: vec![
                (members[0], dec!(20.00)),
                (members[1], dec!(30.00)),
                (members[2], dec!(50.00)),
            ],
        };

        let shares = apportion(&request, Currency::INR, &members).unwrap();

        assert_eq!(shares[0].owed.amount(), dec!(20.00));
        assert_eq!(shares[1].owed.amount(), dec!(30.00));
        assert_eq!(shares[2].owed.amount(), dec!(50.00));
    }
}

mod percentage_policy {
    use super::*;

    #[test]
    fn test_percentage_shares() {
        let members = members(2);
        let request = SplitRequest {
            amount: dec!(200.00),
            policy: SplitPolicy::Percentage,
            paid_by: vec![(members[1], dec!(200.00))],
            owed_by: vec![(members[0], dec!(25.00)), (members[1], dec!(75.00))],
        };

        let shares = apportion(&request, Currency::INR, &members).unwrap();

        assert_eq!(shares[0].owed.amount(), dec!(50.00));
        assert_eq!(shares[1].owed.amount(), dec!(150.00));
    }

    #[test]
    fn test_member_outside_mapping_owes_nothing() {
        let members = members(3);
        let request = SplitRequest {
            amount: dec!(80.00),
            policy: SplitPolicy::Percentage,
            paid_by: vec![(members[0], dec!(80.00))],
            owed_by: vec![(members[0], dec!(50.00)), (members[1], dec!(50.00))],
        };

        let shares = apportion(&request, Currency::INR, &members).unwrap();
        assert_eq!(shares[2].owed.amount(), Decimal::ZERO);
    }
}

mod conservation {
    use super::*;

    #[test]
    fn test_paid_and_owed_sums_match_amount_for_every_policy() {
        let members = members(4);
        let requests = vec![
            SplitRequest {
                amount: dec!(100.01),
                policy: SplitPolicy::Equal,
                paid_by: vec![(members[0], dec!(60.01)), (members[1], dec!(40.00))],
                owed_by: vec![],
            },
            SplitRequest {
                amount: dec!(100.01),
                policy: SplitPolicy::Fixed,
                paid_by: vec![(members[0], dec!(100.01))],
                owed_by: vec![
                    (members[1], dec!(33.34)),
                    (members[2], dec!(33.34)),
                    (members[3], dec!(33.33)),
                ],
            },
            SplitRequest {
                amount: dec!(100.01),
                policy: SplitPolicy::Percentage,
                paid_by: vec![(members[0], dec!(100.01))],
                owed_by: vec![
                    (members[0], dec!(40.00)),
                    (members[1], dec!(35.00)),
                    (members[2], dec!(25.00)),
                ],
            },
        ];

        for request in requests {
            let shares = apportion(&request, Currency::INR, &members).unwrap();
            assert_eq!(
                paid_sum(&shares),
                request.amount,
                "paid sum for {:?}",
                request.policy
            );
            assert_eq!(
                owed_sum(&shares).round_dp(2),
                request.amount,
                "owed sum for {:?}",
                request.policy
            );
        }
    }
}

mod wire_format {
    use super::*;

    #[test]
    fn test_policy_tags_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&SplitPolicy::Equal).unwrap(),
            "\"equal\""
        );
        assert_eq!(
            serde_json::to_string(&SplitPolicy::Fixed).unwrap(),
            "\"fixed\""
        );
        assert_eq!(
            serde_json::to_string(&SplitPolicy::Percentage).unwrap(),
            "\"percentage\""
        );
    }

    #[test]
    fn test_split_request_defaults_empty_mappings() {
        let json = r#"{"amount":"90.00","policy":"equal"}"#;
        let request: SplitRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.amount, dec!(90.00));
        assert_eq!(request.policy, SplitPolicy::Equal);
        assert!(request.paid_by.is_empty());
        assert!(request.owed_by.is_empty());
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn equal_split_conserves_any_amount(
            amount_minor in 1i64..10_000_000i64,
            member_count in 1usize..20usize
        ) {
            let members = members(member_count);
            let amount = Decimal::new(amount_minor, 2);
            let request = SplitRequest {
                amount,
                policy: SplitPolicy::Equal,
                paid_by: vec![(members[0], amount)],
                owed_by: vec![],
            };

            let shares = apportion(&request, Currency::INR, &members).unwrap();
            prop_assert_eq!(owed_sum(&shares), amount);
        }
    }
}
