//! Users, groups, and memberships
//!
//! The ledger references users by id only; identity and authentication live
//! with the external identity collaborator, which provisions ledger users
//! through [`crate::service::LedgerService::ensure_user`].

use serde::{Deserialize, Serialize};

use core_kernel::{impl_soft_delete, AuditStamps, Currency, GroupId, MembershipId, UserId};

/// A ledger-side user record
///
/// Mirrors the identity collaborator's user; name and email are display
/// data, never used for matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (shared with the identity collaborator)
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Audit stamps
    pub stamps: AuditStamps,
}

impl User {
    /// Creates a new user record
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            stamps: AuditStamps::now(),
        }
    }
}

/// A group of users sharing bills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,
    /// Unique group name
    pub name: String,
    /// The user who created the group
    pub created_by: UserId,
    /// Whether group balances are derived by multilateral netting of
    /// expenses rather than raw payment history
    pub simplify_payments: bool,
    /// Default currency for the group's bills
    pub default_currency: Currency,
    /// Audit stamps
    pub stamps: AuditStamps,
}

impl Group {
    /// Creates a new group owned by `created_by`
    ///
    /// Simplified payments are off and the currency is the default until
    /// toggled by the owner.
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: GroupId::new_v7(),
            name: name.into(),
            created_by,
            simplify_payments: false,
            default_currency: Currency::default(),
            stamps: AuditStamps::now(),
        }
    }

    /// Sets the balance aggregation mode
    pub fn with_simplify_payments(mut self, simplify: bool) -> Self {
        self.simplify_payments = simplify;
        self
    }

    /// Sets the default currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }
}

/// A (user, group) membership pair
///
/// Membership is required for a user to appear in a group bill's split or
/// pay inputs. The membership-management collaborator removes a membership
/// only after checking the member's group balance is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    /// Unique identifier
    pub id: MembershipId,
    /// The member
    pub user_id: UserId,
    /// The group
    pub group_id: GroupId,
    /// Audit stamps
    pub stamps: AuditStamps,
}

impl Membership {
    /// Creates a membership linking `user_id` to `group_id`
    pub fn new(user_id: UserId, group_id: GroupId) -> Self {
        Self {
            id: MembershipId::new_v7(),
            user_id,
            group_id,
            stamps: AuditStamps::now(),
        }
    }
}

impl_soft_delete!(User, Group, Membership);
