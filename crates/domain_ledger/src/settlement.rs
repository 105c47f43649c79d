//! Bill settlement generation
//!
//! Reduces one bill's per-user net positions into a short list of
//! point-to-point transfers. This is a greedy two-cursor matching over the
//! sorted creditor and debtor lists, not a globally minimal-transaction
//! solver; it emits at most `creditors + debtors - 1` transfers and netting
//! them reproduces every user's balance exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

use crate::split::ExpenseShare;

/// A directed transfer between two users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// The user sending money
    pub from: UserId,
    /// The user receiving money
    pub to: UserId,
    /// Transferred amount (> 0)
    pub amount: Decimal,
}

/// Computes the transfers that settle a bill's expense shares
///
/// Users with `paid > owed` are creditors, `paid < owed` debtors. Creditors
/// are walked largest-first and debtors most-negative-first (ties broken by
/// user id so the output is deterministic); each step transfers the smaller
/// of the two open remainders from the current debtor to the current
/// creditor and advances whichever side reached zero.
pub fn settle_shares(shares: &[ExpenseShare]) -> Vec<Transfer> {
    let balances = shares
        .iter()
        .map(|share| (share.user_id, share.paid.amount() - share.owed.amount()));
    settle_balances(balances)
}

/// Computes the transfers that settle a set of signed net balances
pub fn settle_balances(balances: impl IntoIterator<Item = (UserId, Decimal)>) -> Vec<Transfer> {
    let mut creditors: Vec<(UserId, Decimal)> = Vec::new();
    let mut debtors: Vec<(UserId, Decimal)> = Vec::new();

    for (user, balance) in balances {
        if balance > Decimal::ZERO {
            creditors.push((user, balance));
        } else if balance < Decimal::ZERO {
            debtors.push((user, balance));
        }
    }

    creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    debtors.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let mut transfers = Vec::new();
    let mut ci = 0;
    let mut di = 0;

    while ci < creditors.len() && di < debtors.len() {
        let amount = creditors[ci].1.min(-debtors[di].1);

        transfers.push(Transfer {
            from: debtors[di].0,
            to: creditors[ci].0,
            amount,
        });

        creditors[ci].1 -= amount;
        debtors[di].1 += amount;

        if creditors[ci].1.is_zero() {
            ci += 1;
        }
        if debtors[di].1.is_zero() {
            di += 1;
        }
    }

    transfers
}
