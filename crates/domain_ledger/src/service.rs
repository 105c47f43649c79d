//! Ledger application service
//!
//! The operations a request handler calls once the outer layers have done
//! their work: the caller supplies validated user/group references and the
//! raw split inputs; authorization belongs to the excluded CRUD layer.
//!
//! Bill creation and edit run the apportioner and the settlement generator,
//! then persist the bill with its children as one atomic unit. Creation
//! additionally hands the affected users to the cross-group reconciler,
//! detached from the request.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use core_kernel::{BillId, GroupId, Money, UserId};

use crate::balance::BalanceAggregator;
use crate::bill::{Bill, Expense, Note, Payment};
use crate::error::LedgerError;
use crate::group::User;
use crate::ports::{LedgerStore, ReconcileSpawner};
use crate::reconciler::Reconciler;
use crate::split::{self, SplitRequest};
use crate::settlement;

/// Application service for the ledger core
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    spawner: Arc<dyn ReconcileSpawner>,
    aggregator: BalanceAggregator,
    reconciler: Reconciler,
}

impl LedgerService {
    /// Creates the service over a store and a task spawner
    pub fn new(store: Arc<dyn LedgerStore>, spawner: Arc<dyn ReconcileSpawner>) -> Self {
        let aggregator = BalanceAggregator::new(store.clone());
        let reconciler = Reconciler::new(store.clone());
        Self {
            store,
            spawner,
            aggregator,
            reconciler,
        }
    }

    /// Provisions a ledger user record for an identity-collaborator user
    ///
    /// Idempotent: called by the identity collaborator on user creation,
    /// and safe to repeat.
    #[instrument(skip(self, name, email))]
    pub async fn ensure_user(
        &self,
        id: UserId,
        name: &str,
        email: &str,
    ) -> Result<User, LedgerError> {
        Ok(self.store.ensure_user(id, name, email).await?)
    }

    /// Records a new bill in a group
    ///
    /// Validates and apportions the split inputs, generates the settling
    /// payments, and persists the bill with its expense/payment children
    /// atomically. The cross-group reconciler then runs detached over the
    /// users touched by the bill; its outcome never affects this call.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Validation` when the split inputs don't reconcile
    ///   or reference a non-member; nothing is written
    /// - `LedgerError::NotFound` when the group does not exist
    #[instrument(skip(self, title, request), fields(group_id = %group_id))]
    pub async fn add_bill(
        &self,
        group_id: GroupId,
        added_by: UserId,
        title: &str,
        request: &SplitRequest,
    ) -> Result<Bill, LedgerError> {
        let group = self.store.group(group_id).await?;
        let members = self.store.members_of_group(group_id).await?;

        let shares = split::apportion(request, group.default_currency, &members)?;
        let transfers = settlement::settle_shares(&shares);

        let bill = Bill::new(
            title,
            group_id,
            added_by,
            Money::new(request.amount, group.default_currency),
        );
        let expenses = expense_rows(&bill, &shares);
        let payments = payment_rows(&bill, group.default_currency, &transfers);

        let touched: Vec<UserId> = expenses.iter().map(|e| e.user_id).collect();

        self.store
            .record_bill(bill.clone(), expenses, payments)
            .await?;

        debug!(bill_id = %bill.id, users = touched.len(), "bill recorded, scheduling sweep");
        let reconciler = self.reconciler.clone();
        self.spawner
            .spawn_detached(Box::pin(async move { reconciler.auto_settle(touched).await }));

        Ok(bill)
    }

    /// Replaces an existing bill's amount, title, and children
    ///
    /// The new split inputs are validated against the bill's group exactly
    /// as on creation; all prior expense/payment rows are dropped and the
    /// recomputed ones inserted in the same atomic unit.
    #[instrument(skip(self, title, request), fields(bill_id = %bill_id))]
    pub async fn edit_bill(
        &self,
        bill_id: BillId,
        title: &str,
        request: &SplitRequest,
    ) -> Result<Bill, LedgerError> {
        let mut bill = self.store.bill(bill_id).await?;
        let group = self.store.group(bill.group_id).await?;
        let members = self.store.members_of_group(bill.group_id).await?;

        let shares = split::apportion(request, group.default_currency, &members)?;
        let transfers = settlement::settle_shares(&shares);

        bill.title = title.to_string();
        bill.amount = Money::new(request.amount, group.default_currency);
        bill.stamps.touch();

        let expenses = expense_rows(&bill, &shares);
        let payments = payment_rows(&bill, group.default_currency, &transfers);

        self.store
            .replace_bill(bill.clone(), expenses, payments)
            .await?;

        Ok(bill)
    }

    /// The user's net position versus every other user in a group
    pub async fn group_balance(
        &self,
        user: UserId,
        group_id: GroupId,
    ) -> Result<BTreeMap<UserId, Decimal>, LedgerError> {
        let group = self.store.group(group_id).await?;
        self.aggregator.group_balance(user, &group).await
    }

    /// The user's net position versus every other user across all groups
    pub async fn overall_balance(
        &self,
        user: UserId,
    ) -> Result<BTreeMap<UserId, Decimal>, LedgerError> {
        self.aggregator.overall_balance(user).await
    }

    /// Zeroes the pending balance between two users in a group
    ///
    /// Returns the settled amount, or `LedgerError::NoBalance` when the
    /// pair has nothing pending.
    pub async fn settle_group_balance(
        &self,
        user: UserId,
        other: UserId,
        group_id: GroupId,
    ) -> Result<Money, LedgerError> {
        self.reconciler
            .settle_group_balance(user, other, group_id)
            .await
    }

    /// Whether the user still has any unsettled balance in the group
    ///
    /// The membership-management collaborator calls this before removing a
    /// member.
    pub async fn member_has_balance(
        &self,
        user: UserId,
        group_id: GroupId,
    ) -> Result<bool, LedgerError> {
        let group = self.store.group(group_id).await?;
        let owe_map = self.aggregator.group_balance(user, &group).await?;
        Ok(!owe_map.is_empty())
    }

    /// Attaches a note (comment and/or image reference) to a bill
    ///
    /// # Errors
    ///
    /// - `LedgerError::Validation` when neither text nor image is supplied
    /// - `LedgerError::NotFound` when the bill does not exist
    #[instrument(skip(self, text, image), fields(bill_id = %bill_id))]
    pub async fn add_note(
        &self,
        bill_id: BillId,
        text: Option<String>,
        image: Option<String>,
    ) -> Result<Note, LedgerError> {
        if text.is_none() && image.is_none() {
            return Err(LedgerError::validation(
                "A note needs a comment or an image",
            ));
        }

        self.store.bill(bill_id).await?;

        let note = Note::new(bill_id, text, image);
        self.store.add_note(note.clone()).await?;
        Ok(note)
    }
}

/// Builds the bill's expense rows, skipping members the bill doesn't touch
fn expense_rows(bill: &Bill, shares: &[split::ExpenseShare]) -> Vec<Expense> {
    shares
        .iter()
        .filter(|share| !share.is_empty())
        .map(|share| Expense::new(bill.id, share.user_id, share.paid, share.owed))
        .collect()
}

/// Builds the bill's payment rows from the generated transfers
fn payment_rows(
    bill: &Bill,
    currency: core_kernel::Currency,
    transfers: &[settlement::Transfer],
) -> Vec<Payment> {
    transfers
        .iter()
        .map(|transfer| {
            Payment::new(
                bill.id,
                transfer.from,
                transfer.to,
                Money::new(transfer.amount, currency),
            )
        })
        .collect()
}
