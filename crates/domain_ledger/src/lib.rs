//! Ledger Domain - Debt Ledger and Settlement Engine
//!
//! This crate implements the computational core of the shared-expense
//! ledger: members of a group record bills, each bill's cost is apportioned
//! among members by a split policy with exact penny-level conservation, and
//! the resulting net positions are tracked and settled.
//!
//! # Components
//!
//! - [`split`]: turns a bill's amount, split policy, and pay/owe inputs
//!   into exact per-user (paid, owed) pairs
//! - [`settlement`]: reduces one bill's net positions into a short list of
//!   payer-to-receiver transfers
//! - [`balance`]: aggregates a user's net position per group or globally
//! - [`netting`]: priority-based multilateral netting for groups running in
//!   simplified-payments mode
//! - [`reconciler`]: settlement transactions and the detached cross-group
//!   sweep that collapses residual balances
//! - [`service`]: the application service request handlers call
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{LedgerService, SplitRequest, SplitPolicy};
//!
//! let service = LedgerService::new(store, spawner);
//! let bill = service
//!     .add_bill(group_id, user_id, "Dinner", &request)
//!     .await?;
//! ```

pub mod balance;
pub mod bill;
pub mod error;
pub mod group;
pub mod netting;
pub mod ports;
pub mod reconciler;
pub mod service;
pub mod settlement;
pub mod split;

pub use balance::BalanceAggregator;
pub use bill::{Bill, Expense, Note, Payment};
pub use error::LedgerError;
pub use group::{Group, Membership, User};
pub use ports::{DetachedTask, LedgerStore, ReconcileSpawner};
pub use reconciler::{Reconciler, SETTLEMENT_BILL_TITLE};
pub use service::LedgerService;
pub use settlement::{settle_balances, settle_shares, Transfer};
pub use split::{apportion, ExpenseShare, SplitPolicy, SplitRequest};
