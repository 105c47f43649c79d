//! Settlement transactions and the cross-group reconciler
//!
//! A settlement transaction zeroes the pending balance between two users in
//! one group by recording an offsetting synthetic bill. The reconciler is
//! the background sweep that, after a bill lands, finds user pairs whose
//! overall balance is already even but whose per-group balance is not, and
//! settles the residual so per-group views stay clean.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{GroupId, Money, UserId};

use crate::balance::BalanceAggregator;
use crate::bill::{Bill, Expense, Payment};
use crate::error::LedgerError;
use crate::ports::LedgerStore;

/// Title stamped on every synthetic settlement bill
pub const SETTLEMENT_BILL_TITLE: &str = "Settle Balance";

/// Settles balances between user pairs, directly or via the background sweep
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn LedgerStore>,
    aggregator: BalanceAggregator,
}

impl Reconciler {
    /// Creates a reconciler over the given store
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        let aggregator = BalanceAggregator::new(store.clone());
        Self { store, aggregator }
    }

    /// Zeroes the pending balance between `user` and `other` in one group
    ///
    /// Records a synthetic bill of the pending amount whose expense and
    /// payment rows are the exact reverse of the pair's outstanding
    /// position, all in one atomic write; netting the bill against the
    /// existing rows brings the pair's group balance to zero. Because the
    /// pending balance is recomputed here and the store serializes writers,
    /// a duplicate invocation finds nothing pending and no-ops with
    /// `NoBalance`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::NoBalance` when the pair has nothing pending
    /// - `LedgerError::NotFound` when the group does not exist
    ///
    /// # Returns
    ///
    /// The settled amount.
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn settle_group_balance(
        &self,
        user: UserId,
        other: UserId,
        group_id: GroupId,
    ) -> Result<Money, LedgerError> {
        let group = self.store.group(group_id).await?;
        let owe_map = self.aggregator.group_balance(user, &group).await?;

        let net = *owe_map
            .get(&other)
            .ok_or(LedgerError::NoBalance { user, other })?;

        // Positive net: `other` owes `user` in this group. The synthetic
        // bill is the reverse of that position, so netting it against the
        // existing rows cancels the pair's group balance.
        let (payer, ower) = if net > rust_decimal::Decimal::ZERO {
            (other, user)
        } else {
            (user, other)
        };
        let amount = Money::new(net.abs(), group.default_currency);

        let bill = Bill::new(SETTLEMENT_BILL_TITLE, group_id, user, amount);
        let expenses = vec![
            Expense::new(bill.id, payer, amount, Money::zero(group.default_currency)),
            Expense::new(bill.id, ower, Money::zero(group.default_currency), amount),
        ];
        let payments = vec![Payment::new(bill.id, ower, payer, amount)];

        self.store.record_bill(bill, expenses, payments).await?;

        info!(%user, %other, %amount, "settled group balance");
        Ok(amount)
    }

    /// Background sweep collapsing cross-group residual balances
    ///
    /// For each triggering user: compute their overall balance, then walk
    /// every group they belong to; any counterparty present in the group
    /// balance but absent from the overall balance has a residual that nets
    /// to zero globally, so the pair is settled in that group. Failures are
    /// isolated per pair and never surface to the request that triggered
    /// the sweep.
    #[instrument(skip(self), fields(users = users.len()))]
    pub async fn auto_settle(&self, users: Vec<UserId>) {
        for user in users {
            let overall = match self.aggregator.overall_balance(user).await {
                Ok(balances) => balances,
                Err(error) => {
                    warn!(%user, %error, "skipping user: overall balance failed");
                    continue;
                }
            };

            let memberships = match self.store.memberships_of_user(user).await {
                Ok(memberships) => memberships,
                Err(error) => {
                    warn!(%user, %error, "skipping user: membership lookup failed");
                    continue;
                }
            };

            for membership in memberships {
                let group = match self.store.group(membership.group_id).await {
                    Ok(group) => group,
                    Err(error) => {
                        warn!(group_id = %membership.group_id, %error, "skipping group");
                        continue;
                    }
                };

                let group_balance = match self.aggregator.group_balance(user, &group).await {
                    Ok(balances) => balances,
                    Err(error) => {
                        warn!(group_id = %group.id, %error, "skipping group: balance failed");
                        continue;
                    }
                };

                for counterparty in group_balance.keys().copied() {
                    if overall.contains_key(&counterparty) {
                        continue;
                    }

                    // A missing identity record aborts this pair only.
                    if let Err(error) = self.store.user(counterparty).await {
                        warn!(%counterparty, %error, "skipping pair: identity lookup failed");
                        continue;
                    }

                    match self.settle_group_balance(user, counterparty, group.id).await {
                        Ok(amount) => {
                            info!(%user, %counterparty, group_id = %group.id, %amount,
                                "auto-settled residual balance");
                        }
                        Err(error) if error.is_no_balance() => {
                            // A concurrent sweep got there first.
                            debug!(%user, %counterparty, "nothing left to settle");
                        }
                        Err(error) => {
                            warn!(%user, %counterparty, %error, "auto-settle failed for pair");
                        }
                    }
                }
            }
        }
    }
}
