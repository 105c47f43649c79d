//! Bills and their expense/payment children
//!
//! A bill is one shared expense event. Its Expense rows record who paid and
//! who owes what; its Payment rows are the directed transfers that settle
//! the bill's net positions. Both sets are created atomically with the bill
//! and replaced atomically on edit; there is no historical versioning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{impl_soft_delete, AuditStamps, BillId, ExpenseId, GroupId, Money, NoteId, PaymentId, UserId};

/// One shared expense event within a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: BillId,
    /// Human-readable title
    pub title: String,
    /// Owning group
    pub group_id: GroupId,
    /// The user who recorded the bill
    pub added_by: UserId,
    /// Total bill amount
    pub amount: Money,
    /// Audit stamps
    pub stamps: AuditStamps,
}

impl Bill {
    /// Creates a new bill
    pub fn new(title: impl Into<String>, group_id: GroupId, added_by: UserId, amount: Money) -> Self {
        Self {
            id: BillId::new_v7(),
            title: title.into(),
            group_id,
            added_by,
            amount,
            stamps: AuditStamps::now(),
        }
    }
}

/// One user's paid/owed pair for a bill
///
/// # Invariants
///
/// For a given bill, `Σ amount_paid == bill.amount` and
/// `Σ amount_owed == bill.amount` across its expense rows, exact to the cent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,
    /// Owning bill
    pub bill_id: BillId,
    /// The user this row belongs to
    pub user_id: UserId,
    /// What the user contributed toward the bill
    pub amount_paid: Money,
    /// What the user owes for the bill
    pub amount_owed: Money,
    /// Audit stamps
    pub stamps: AuditStamps,
}

impl Expense {
    /// Creates an expense row for `user_id` on `bill_id`
    pub fn new(bill_id: BillId, user_id: UserId, amount_paid: Money, amount_owed: Money) -> Self {
        Self {
            id: ExpenseId::new_v7(),
            bill_id,
            user_id,
            amount_paid,
            amount_owed,
            stamps: AuditStamps::now(),
        }
    }

    /// The user's net position on this row (paid minus owed)
    pub fn net(&self) -> Decimal {
        self.amount_paid.amount() - self.amount_owed.amount()
    }
}

/// A directed transfer settling part of a bill's net positions
///
/// # Invariants
///
/// `amount` is strictly positive. For a given bill, netting the payment rows
/// per user reproduces exactly the per-user `Σ paid − Σ owed` of the bill's
/// expense rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Owning bill
    pub bill_id: BillId,
    /// The user sending money
    pub payer: UserId,
    /// The user receiving money
    pub receiver: UserId,
    /// Transferred amount (> 0)
    pub amount: Money,
    /// Audit stamps
    pub stamps: AuditStamps,
}

impl Payment {
    /// Creates a payment row from `payer` to `receiver`
    pub fn new(bill_id: BillId, payer: UserId, receiver: UserId, amount: Money) -> Self {
        Self {
            id: PaymentId::new_v7(),
            bill_id,
            payer,
            receiver,
            amount,
            stamps: AuditStamps::now(),
        }
    }
}

/// Free-form annotation on a bill (text and/or an image reference)
///
/// Notes have no computational role in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Owning bill
    pub bill_id: BillId,
    /// Optional comment text
    pub text: Option<String>,
    /// Optional image reference (path or URL, stored by the media collaborator)
    pub image: Option<String>,
    /// Audit stamps
    pub stamps: AuditStamps,
}

impl Note {
    /// Creates a note on `bill_id`
    pub fn new(bill_id: BillId, text: Option<String>, image: Option<String>) -> Self {
        Self {
            id: NoteId::new_v7(),
            bill_id,
            text,
            image,
            stamps: AuditStamps::now(),
        }
    }
}

impl_soft_delete!(Bill, Expense, Payment, Note);
