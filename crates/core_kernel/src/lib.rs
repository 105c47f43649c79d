//! Core Kernel - Foundational types and utilities for the split ledger
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Audit stamps and the soft-delete capability
//! - Port error types for the ports-and-adapters seams

pub mod audit;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use audit::{AuditStamps, SoftDelete};
pub use identifiers::{BillId, ExpenseId, GroupId, MembershipId, NoteId, PaymentId, UserId};
pub use money::{Currency, Money, MoneyError, Rate};
pub use ports::{DomainPort, PortError};
