//! Balance aggregation
//!
//! Computes one user's net position versus every other user, either within
//! a group or globally, from stored ledger facts. Positive entries mean the
//! counterparty owes the user. Results are rounded to the cent and entries
//! that round to exactly zero are dropped.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

use core_kernel::UserId;

use crate::bill::Payment;
use crate::error::LedgerError;
use crate::group::Group;
use crate::netting;
use crate::ports::LedgerStore;

/// Read-side service computing group and overall balances
#[derive(Clone)]
pub struct BalanceAggregator {
    store: Arc<dyn LedgerStore>,
}

impl BalanceAggregator {
    /// Creates an aggregator over the given store
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Computes `user`'s net position versus every other user in `group`
    ///
    /// With `simplify_payments` off, the balance is the fold of the group's
    /// stored payment rows touching the user: paying contributes negatively
    /// toward the counterparty, receiving positively. With it on, the
    /// group's expense rows are netted per user and the multilateral
    /// netting engine produces the user's slice.
    #[instrument(skip(self, group), fields(group_id = %group.id))]
    pub async fn group_balance(
        &self,
        user: UserId,
        group: &Group,
    ) -> Result<BTreeMap<UserId, Decimal>, LedgerError> {
        let owe_map = if !group.simplify_payments {
            let payments = self.store.payments_by_group(group.id).await?;
            fold_payments(user, &payments)
        } else {
            let expenses = self.store.expenses_by_group(group.id).await?;
            let mut balances: BTreeMap<UserId, Decimal> = BTreeMap::new();
            for expense in &expenses {
                *balances.entry(expense.user_id).or_insert(Decimal::ZERO) += expense.net();
            }
            netting::net_for_user(&balances, user)
        };

        Ok(round_and_prune(owe_map))
    }

    /// Computes `user`'s net position versus every other user across all
    /// groups
    ///
    /// Always derived from raw payment rows; the simplified/netted path is
    /// a per-group view only.
    #[instrument(skip(self))]
    pub async fn overall_balance(
        &self,
        user: UserId,
    ) -> Result<BTreeMap<UserId, Decimal>, LedgerError> {
        let payments = self.store.payments_touching_user(user).await?;
        Ok(round_and_prune(fold_payments(user, &payments)))
    }
}

/// Folds payment rows into the user's signed per-counterparty balances
fn fold_payments(user: UserId, payments: &[Payment]) -> BTreeMap<UserId, Decimal> {
    let mut owe_map: BTreeMap<UserId, Decimal> = BTreeMap::new();
    for payment in payments {
        if payment.payer == user {
            *owe_map.entry(payment.receiver).or_insert(Decimal::ZERO) -= payment.amount.amount();
        } else if payment.receiver == user {
            *owe_map.entry(payment.payer).or_insert(Decimal::ZERO) += payment.amount.amount();
        }
    }
    owe_map
}

/// Rounds balances to the cent and drops entries that round to zero
fn round_and_prune(owe_map: BTreeMap<UserId, Decimal>) -> BTreeMap<UserId, Decimal> {
    owe_map
        .into_iter()
        .map(|(user, balance)| (user, balance.round_dp(2)))
        .filter(|(_, balance)| !balance.is_zero())
        .collect()
}
