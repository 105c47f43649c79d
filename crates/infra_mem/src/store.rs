//! In-memory ledger store
//!
//! All state lives behind one `RwLock`; every write takes the single write
//! guard, which serializes concurrent writers and makes the multi-row
//! bill operations atomic - the isolation the settlement transaction's
//! read-then-write depends on. Queries filter soft-deleted rows, so the
//! domain layer never sees a deleted record.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument};

use core_kernel::{BillId, DomainPort, GroupId, PortError, SoftDelete, UserId};
use domain_ledger::{Bill, Expense, Group, LedgerStore, Membership, Note, Payment, User};

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    groups: HashMap<GroupId, Group>,
    memberships: Vec<Membership>,
    bills: HashMap<BillId, Bill>,
    expenses: Vec<Expense>,
    payments: Vec<Payment>,
    notes: Vec<Note>,
}

/// Process-local implementation of [`LedgerStore`]
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<StoreState>,
}

impl InMemoryLedger {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, PortError> {
        self.state
            .read()
            .map_err(|_| PortError::internal("store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, PortError> {
        self.state
            .write()
            .map_err(|_| PortError::internal("store lock poisoned"))
    }

    /// Inserts a user record
    ///
    /// Seeding hook for the external identity/CRUD collaborators and the
    /// test suite; the domain layer provisions users through
    /// [`LedgerStore::ensure_user`] instead.
    pub fn insert_user(&self, user: User) -> Result<(), PortError> {
        self.write()?.users.insert(user.id, user);
        Ok(())
    }

    /// Inserts a group, rejecting duplicate names
    pub fn insert_group(&self, group: Group) -> Result<(), PortError> {
        let mut state = self.write()?;
        let name_taken = state
            .groups
            .values()
            .any(|g| !g.is_deleted() && g.name == group.name && g.id != group.id);
        if name_taken {
            return Err(PortError::conflict(format!(
                "Group name already exists: {}",
                group.name
            )));
        }
        state.groups.insert(group.id, group);
        Ok(())
    }

    /// Inserts a membership, rejecting duplicates for a live pair
    pub fn insert_membership(&self, membership: Membership) -> Result<(), PortError> {
        let mut state = self.write()?;
        let exists = state.memberships.iter().any(|m| {
            !m.is_deleted()
                && m.user_id == membership.user_id
                && m.group_id == membership.group_id
        });
        if exists {
            return Err(PortError::conflict("User already present in group"));
        }
        state.memberships.push(membership);
        Ok(())
    }

    /// Soft-deletes a membership
    pub fn remove_membership(&self, user_id: UserId, group_id: GroupId) -> Result<(), PortError> {
        let mut state = self.write()?;
        let membership = state
            .memberships
            .iter_mut()
            .find(|m| !m.is_deleted() && m.user_id == user_id && m.group_id == group_id)
            .ok_or_else(|| PortError::not_found("Membership", format!("{}/{}", user_id, group_id)))?;
        membership.mark_deleted();
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    #[instrument(skip(self, name, email))]
    async fn ensure_user(&self, id: UserId, name: &str, email: &str) -> Result<User, PortError> {
        let mut state = self.write()?;
        if let Some(existing) = state.users.get(&id).filter(|u| !u.is_deleted()) {
            return Ok(existing.clone());
        }
        debug!(%id, "provisioning ledger user");
        let user = User::new(id, name, email);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: UserId) -> Result<User, PortError> {
        self.read()?
            .users
            .get(&id)
            .filter(|u| !u.is_deleted())
            .cloned()
            .ok_or_else(|| PortError::not_found("User", id))
    }

    async fn group(&self, id: GroupId) -> Result<Group, PortError> {
        self.read()?
            .groups
            .get(&id)
            .filter(|g| !g.is_deleted())
            .cloned()
            .ok_or_else(|| PortError::not_found("Group", id))
    }

    async fn bill(&self, id: BillId) -> Result<Bill, PortError> {
        self.read()?
            .bills
            .get(&id)
            .filter(|b| !b.is_deleted())
            .cloned()
            .ok_or_else(|| PortError::not_found("Bill", id))
    }

    async fn members_of_group(&self, group_id: GroupId) -> Result<Vec<UserId>, PortError> {
        Ok(self
            .read()?
            .memberships
            .iter()
            .filter(|m| !m.is_deleted() && m.group_id == group_id)
            .map(|m| m.user_id)
            .collect())
    }

    async fn memberships_of_user(&self, user_id: UserId) -> Result<Vec<Membership>, PortError> {
        Ok(self
            .read()?
            .memberships
            .iter()
            .filter(|m| !m.is_deleted() && m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn expenses_by_group(&self, group_id: GroupId) -> Result<Vec<Expense>, PortError> {
        let state = self.read()?;
        Ok(state
            .expenses
            .iter()
            .filter(|e| !e.is_deleted())
            .filter(|e| {
                state
                    .bills
                    .get(&e.bill_id)
                    .is_some_and(|b| !b.is_deleted() && b.group_id == group_id)
            })
            .cloned()
            .collect())
    }

    async fn expenses_by_bill(&self, bill_id: BillId) -> Result<Vec<Expense>, PortError> {
        Ok(self
            .read()?
            .expenses
            .iter()
            .filter(|e| !e.is_deleted() && e.bill_id == bill_id)
            .cloned()
            .collect())
    }

    async fn payments_by_group(&self, group_id: GroupId) -> Result<Vec<Payment>, PortError> {
        let state = self.read()?;
        Ok(state
            .payments
            .iter()
            .filter(|p| !p.is_deleted())
            .filter(|p| {
                state
                    .bills
                    .get(&p.bill_id)
                    .is_some_and(|b| !b.is_deleted() && b.group_id == group_id)
            })
            .cloned()
            .collect())
    }

    async fn payments_by_bill(&self, bill_id: BillId) -> Result<Vec<Payment>, PortError> {
        Ok(self
            .read()?
            .payments
            .iter()
            .filter(|p| !p.is_deleted() && p.bill_id == bill_id)
            .cloned()
            .collect())
    }

    async fn payments_touching_user(&self, user_id: UserId) -> Result<Vec<Payment>, PortError> {
        let state = self.read()?;
        Ok(state
            .payments
            .iter()
            .filter(|p| !p.is_deleted())
            .filter(|p| p.payer == user_id || p.receiver == user_id)
            .filter(|p| {
                state
                    .bills
                    .get(&p.bill_id)
                    .is_some_and(|b| !b.is_deleted())
            })
            .cloned()
            .collect())
    }

    #[instrument(skip(self, bill, expenses, payments), fields(bill_id = %bill.id))]
    async fn record_bill(
        &self,
        bill: Bill,
        expenses: Vec<Expense>,
        payments: Vec<Payment>,
    ) -> Result<(), PortError> {
        let mut state = self.write()?;
        if !state.groups.get(&bill.group_id).is_some_and(|g| !g.is_deleted()) {
            return Err(PortError::not_found("Group", bill.group_id));
        }

        debug!(
            expenses = expenses.len(),
            payments = payments.len(),
            "recording bill"
        );
        state.bills.insert(bill.id, bill);
        state.expenses.extend(expenses);
        state.payments.extend(payments);
        Ok(())
    }

    #[instrument(skip(self, bill, expenses, payments), fields(bill_id = %bill.id))]
    async fn replace_bill(
        &self,
        bill: Bill,
        expenses: Vec<Expense>,
        payments: Vec<Payment>,
    ) -> Result<(), PortError> {
        let mut state = self.write()?;
        if !state.bills.contains_key(&bill.id) {
            return Err(PortError::not_found("Bill", bill.id));
        }

        let bill_id = bill.id;
        state.expenses.retain(|e| e.bill_id != bill_id);
        state.payments.retain(|p| p.bill_id != bill_id);
        state.bills.insert(bill_id, bill);
        state.expenses.extend(expenses);
        state.payments.extend(payments);
        Ok(())
    }

    async fn add_note(&self, note: Note) -> Result<(), PortError> {
        self.write()?.notes.push(note);
        Ok(())
    }
}

impl DomainPort for InMemoryLedger {}
