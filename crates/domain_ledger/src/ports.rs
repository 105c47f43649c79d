//! Ledger domain ports
//!
//! The ledger core never manages connections, schemas, or threads itself;
//! it reaches its collaborators through the traits defined here. `infra_mem`
//! provides the in-process adapters; a relational adapter would implement
//! the same contracts.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

use core_kernel::{BillId, DomainPort, GroupId, PortError, UserId};

use crate::bill::{Bill, Expense, Note, Payment};
use crate::group::{Group, Membership, User};

/// A boxed detached task for the spawner port
pub type DetachedTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Persistence/query port for the ledger
///
/// Implementations must filter soft-deleted rows out of every query, and
/// must serialize concurrent writers touching the same group's rows: the
/// `record_bill`/`replace_bill` operations are single atomic units, and the
/// settlement transaction's read-then-write depends on that isolation.
#[async_trait]
pub trait LedgerStore: DomainPort {
    /// Creates the user if absent, otherwise returns the existing record
    ///
    /// This is the provisioning call the identity collaborator makes when
    /// one of its users is created; it is keyed on the natural `UserId`.
    async fn ensure_user(&self, id: UserId, name: &str, email: &str) -> Result<User, PortError>;

    /// Fetches a user by id
    async fn user(&self, id: UserId) -> Result<User, PortError>;

    /// Fetches a group by id
    async fn group(&self, id: GroupId) -> Result<Group, PortError>;

    /// Fetches a bill by id
    async fn bill(&self, id: BillId) -> Result<Bill, PortError>;

    /// Lists the members of a group, in membership creation order
    ///
    /// The order is part of the contract: an equal split with no named
    /// participants distributes leftover cents to the first members in
    /// this order.
    async fn members_of_group(&self, group_id: GroupId) -> Result<Vec<UserId>, PortError>;

    /// Lists a user's memberships across all groups
    async fn memberships_of_user(&self, user_id: UserId) -> Result<Vec<Membership>, PortError>;

    /// Fetches every expense row for bills in a group
    async fn expenses_by_group(&self, group_id: GroupId) -> Result<Vec<Expense>, PortError>;

    /// Fetches a bill's expense rows
    async fn expenses_by_bill(&self, bill_id: BillId) -> Result<Vec<Expense>, PortError>;

    /// Fetches every payment row for bills in a group
    async fn payments_by_group(&self, group_id: GroupId) -> Result<Vec<Payment>, PortError>;

    /// Fetches a bill's payment rows
    async fn payments_by_bill(&self, bill_id: BillId) -> Result<Vec<Payment>, PortError>;

    /// Fetches every payment row where the user is payer or receiver,
    /// across all groups
    async fn payments_touching_user(&self, user_id: UserId) -> Result<Vec<Payment>, PortError>;

    /// Persists a bill with its expense and payment children as one atomic
    /// unit
    ///
    /// Readers must never observe the bill with only part of its children.
    async fn record_bill(
        &self,
        bill: Bill,
        expenses: Vec<Expense>,
        payments: Vec<Payment>,
    ) -> Result<(), PortError>;

    /// Replaces a bill's row and children atomically
    ///
    /// All prior expense/payment rows for the bill are deleted and the new
    /// ones inserted in the same unit; there is no historical versioning.
    async fn replace_bill(
        &self,
        bill: Bill,
        expenses: Vec<Expense>,
        payments: Vec<Payment>,
    ) -> Result<(), PortError>;

    /// Persists a note attached to a bill
    async fn add_note(&self, note: Note) -> Result<(), PortError>;
}

/// Task port for running the cross-group reconciler detached from the
/// request that triggered it
///
/// The contract is deliberately small: the task runs later, does not block
/// the caller, and may run concurrently with other requests.
pub trait ReconcileSpawner: Send + Sync + 'static {
    /// Runs the task detached from the calling request
    fn spawn_detached(&self, task: DetachedTask);
}
