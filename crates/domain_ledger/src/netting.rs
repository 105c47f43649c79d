//! Multilateral netting
//!
//! Given a group's raw per-user net balances, computes a settlement plan by
//! repeatedly matching the largest outstanding creditor against the largest
//! outstanding debtor. The caller names a distinguished user; only that
//! user's slice of the plan is returned, but the whole group's transfer set
//! is walked on every call, so callers must not assume cached state across
//! scope mutations.
//!
//! Tie-break: entries of equal magnitude are ordered by ascending user id.
//! The result is fully deterministic for identical input.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use core_kernel::UserId;

/// One side of the netting queue: an open balance magnitude for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenBalance {
    remaining: Decimal,
    user: UserId,
}

impl Ord for OpenBalance {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on magnitude; equal magnitudes pop in ascending user
        // id order.
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.user.cmp(&self.user))
    }
}

impl PartialOrd for OpenBalance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Computes the distinguished user's transfers under multilateral netting
///
/// Pops the largest creditor and largest debtor, transfers the smaller of
/// the two open magnitudes, and re-queues whichever side still has balance.
/// When the popped debtor is `user`, the amount is recorded as negative
/// against the creditor; when the popped creditor is `user`, as positive
/// against the debtor. The recorded total always equals `user`'s original
/// balance.
///
/// Zero balances take no part in the matching and are skipped up front.
pub fn net_for_user(
    balances: &BTreeMap<UserId, Decimal>,
    user: UserId,
) -> BTreeMap<UserId, Decimal> {
    let mut creditors = BinaryHeap::new();
    let mut debtors = BinaryHeap::new();

    for (&other, &balance) in balances {
        if balance > Decimal::ZERO {
            creditors.push(OpenBalance {
                remaining: balance,
                user: other,
            });
        } else if balance < Decimal::ZERO {
            debtors.push(OpenBalance {
                remaining: -balance,
                user: other,
            });
        }
    }

    let mut slice: BTreeMap<UserId, Decimal> = BTreeMap::new();

    while let (Some(mut creditor), Some(mut debtor)) = (creditors.pop(), debtors.pop()) {
        let amount = creditor.remaining.min(debtor.remaining);

        if debtor.user == user {
            *slice.entry(creditor.user).or_insert(Decimal::ZERO) -= amount;
        } else if creditor.user == user {
            *slice.entry(debtor.user).or_insert(Decimal::ZERO) += amount;
        }

        creditor.remaining -= amount;
        if creditor.remaining > Decimal::ZERO {
            creditors.push(creditor);
        }

        debtor.remaining -= amount;
        if debtor.remaining > Decimal::ZERO {
            debtors.push(debtor);
        }
    }

    slice
}
