//! Custom test assertions
//!
//! Domain-aware assertion helpers that give more meaningful error messages
//! than standard assertions.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use core_kernel::{Money, UserId};
use domain_ledger::{Expense, ExpenseShare};

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics if the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Currency mismatch in sum")
    });

    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts a bill's expense rows conserve its amount on both sides
///
/// `Σ amount_paid == Σ amount_owed == bill_amount`, exact to the cent.
pub fn assert_expenses_conserve_bill(expenses: &[Expense], bill_amount: &Money) {
    let paid: Vec<Money> = expenses.iter().map(|e| e.amount_paid).collect();
    let owed: Vec<Money> = expenses.iter().map(|e| e.amount_owed).collect();

    assert_money_sum_equals(&paid, bill_amount);

    let owed_sum: Decimal = owed.iter().map(|m| m.amount()).sum();
    assert_eq!(
        owed_sum.round_dp(2),
        bill_amount.amount(),
        "Owed sum ({}) doesn't reproduce the bill amount ({})",
        owed_sum,
        bill_amount.amount()
    );
}

/// Asserts apportioned shares conserve the bill amount on both sides
pub fn assert_shares_conserve_amount(shares: &[ExpenseShare], amount: Decimal) {
    let paid: Decimal = shares.iter().map(|s| s.paid.amount()).sum();
    let owed: Decimal = shares.iter().map(|s| s.owed.amount()).sum();

    assert_eq!(paid.round_dp(2), amount, "paid sum mismatch");
    assert_eq!(owed.round_dp(2), amount, "owed sum mismatch");
}

/// Asserts that the per-user balance maps of a closed group net to zero
///
/// Each map is one user's view (counterparty -> signed amount); every
/// pairwise entry counted once must cancel out.
pub fn assert_balances_net_to_zero(views: &BTreeMap<UserId, BTreeMap<UserId, Decimal>>) {
    let mut total = Decimal::ZERO;
    for view in views.values() {
        for amount in view.values() {
            total += amount;
        }
    }
    assert_eq!(
        total,
        Decimal::ZERO,
        "closed group balances must net to zero, got {}",
        total
    );
}

/// Asserts that a balance view has no entry for a counterparty
pub fn assert_no_balance_with(view: &BTreeMap<UserId, Decimal>, counterparty: UserId) {
    assert!(
        !view.contains_key(&counterparty),
        "expected no balance with {}, found {:?}",
        counterparty,
        view.get(&counterparty)
    );
}
