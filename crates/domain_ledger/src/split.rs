//! Expense apportionment
//!
//! Turns a bill's amount, split policy, and per-user pay/owe inputs into
//! exact per-user (paid, owed) pairs. Validation happens before anything is
//! written: the pay total must match the bill, every referenced user must be
//! a group member, and fixed/percentage inputs must reconcile to the amount
//! or to 100.
//!
//! Pay and owe inputs are ordered pair lists, not hash maps: for an equal
//! split the leftover cents after flooring each share go to the first
//! participants *in the order supplied by the caller*, so that order is part
//! of the contract.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, Money, UserId};

use crate::error::LedgerError;

/// How a bill's cost is divided among participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Participants share the amount equally; leftover cents go to the
    /// first participants in input order
    Equal,
    /// Each participant owes the fixed amount supplied for them
    Fixed,
    /// Each participant owes their percentage of the bill amount
    Percentage,
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            SplitPolicy::Equal => "equal",
            SplitPolicy::Fixed => "fixed",
            SplitPolicy::Percentage => "percentage",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for SplitPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(SplitPolicy::Equal),
            "fixed" => Ok(SplitPolicy::Fixed),
            "percentage" => Ok(SplitPolicy::Percentage),
            other => Err(LedgerError::validation(format!(
                "Invalid split type: {}",
                other
            ))),
        }
    }
}

/// The split inputs a request handler supplies for one bill
///
/// `owed_by` values are interpreted per policy: a money amount for `fixed`,
/// a percentage for `percentage`, and ignored (keys only) for `equal`. An
/// empty `owed_by` under `equal` splits across every group member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Total bill amount
    pub amount: Decimal,
    /// Split policy
    pub policy: SplitPolicy,
    /// Who contributed how much, in caller order
    #[serde(default)]
    pub paid_by: Vec<(UserId, Decimal)>,
    /// Who owes what (shape depends on policy), in caller order
    #[serde(default)]
    pub owed_by: Vec<(UserId, Decimal)>,
}

/// One user's computed (paid, owed) pair for a bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseShare {
    /// The group member
    pub user_id: UserId,
    /// What they contributed
    pub paid: Money,
    /// What they owe
    pub owed: Money,
}

impl ExpenseShare {
    /// True when the member neither paid nor owes anything for the bill
    pub fn is_empty(&self) -> bool {
        self.paid.is_zero() && self.owed.is_zero()
    }
}

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Validates a split request against the bill amount and the member set
///
/// # Errors
///
/// Returns `LedgerError::Validation` when:
/// - the amount is not positive
/// - a user appears twice in `paid_by` or `owed_by`
/// - the pay total does not match the bill amount to the cent
/// - any referenced user is not a group member
/// - `fixed` owed values don't sum to the amount, or `percentage` values
///   don't sum to 100
pub fn validate(request: &SplitRequest, members: &[UserId]) -> Result<(), LedgerError> {
    if request.amount <= Decimal::ZERO {
        return Err(LedgerError::validation("Bill amount must be positive"));
    }

    let mut seen = HashSet::new();
    for (user, _) in &request.paid_by {
        if !seen.insert(*user) {
            return Err(LedgerError::validation(format!(
                "Duplicate user in pay data: {}",
                user
            )));
        }
    }
    seen.clear();
    for (user, _) in &request.owed_by {
        if !seen.insert(*user) {
            return Err(LedgerError::validation(format!(
                "Duplicate user in split data: {}",
                user
            )));
        }
    }

    let pay_total: Decimal = request.paid_by.iter().map(|(_, v)| *v).sum();
    if to_cents(pay_total) != to_cents(request.amount) {
        return Err(LedgerError::validation("Bill and pay amount mismatch"));
    }

    let member_set: HashSet<UserId> = members.iter().copied().collect();
    let referenced = request
        .paid_by
        .iter()
        .chain(request.owed_by.iter())
        .map(|(user, _)| *user);
    for user in referenced {
        if !member_set.contains(&user) {
            return Err(LedgerError::validation(format!(
                "User {} is not a member of the group",
                user
            )));
        }
    }

    let owed_total: Decimal = request.owed_by.iter().map(|(_, v)| *v).sum();
    match request.policy {
        SplitPolicy::Fixed => {
            if to_cents(owed_total) != to_cents(request.amount) {
                return Err(LedgerError::validation("Bill and split amount mismatch"));
            }
        }
        SplitPolicy::Percentage => {
            if owed_total != dec!(100) {
                return Err(LedgerError::validation("Split percentages must sum to 100"));
            }
        }
        SplitPolicy::Equal => {}
    }

    Ok(())
}

/// Computes every group member's (paid, owed) pair for a bill
///
/// Runs [`validate`] first, then apportions the amount per the policy. The
/// result has one entry per group member, in `members` order; members
/// outside the split inputs get zero pairs.
///
/// # Postcondition
///
/// `Σ owed == amount` to the cent for every policy: by validation for
/// `fixed`, by exact decimal arithmetic for `percentage`, and by the
/// floor-plus-leftover-cents allocation for `equal`.
pub fn apportion(
    request: &SplitRequest,
    currency: Currency,
    members: &[UserId],
) -> Result<Vec<ExpenseShare>, LedgerError> {
    validate(request, members)?;

    let zero = Money::zero(currency);
    let mut shares: Vec<ExpenseShare> = members
        .iter()
        .map(|user_id| ExpenseShare {
            user_id: *user_id,
            paid: zero,
            owed: zero,
        })
        .collect();

    let index_of = |user: &UserId| -> usize {
        members
            .iter()
            .position(|m| m == user)
            .expect("validated membership")
    };

    for (user, amount) in &request.paid_by {
        shares[index_of(user)].paid = Money::new(*amount, currency);
    }

    let bill_amount = Money::new(request.amount, currency);
    match request.policy {
        SplitPolicy::Fixed => {
            for (user, amount) in &request.owed_by {
                shares[index_of(user)].owed = Money::new(*amount, currency);
            }
        }
        SplitPolicy::Percentage => {
            for (user, percentage) in &request.owed_by {
                shares[index_of(user)].owed =
                    core_kernel::Rate::from_percentage(*percentage).apply(&bill_amount);
            }
        }
        SplitPolicy::Equal => {
            // Participant order is the caller's input order; when no
            // participants are named the whole group splits, in member
            // order.
            let participants: Vec<UserId> = if request.owed_by.is_empty() {
                members.to_vec()
            } else {
                request.owed_by.iter().map(|(user, _)| *user).collect()
            };

            let parts = bill_amount.allocate(participants.len() as u32)?;
            for (user, part) in participants.iter().zip(parts) {
                shares[index_of(user)].owed = part;
            }
        }
    }

    Ok(shares)
}
