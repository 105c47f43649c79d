//! In-memory adapters for the ledger ports
//!
//! Stands in for the relational store the ledger treats as an external
//! collaborator: one process-local store behind a single writer lock, so
//! multi-row writes are atomic and concurrent writers serialize, plus task
//! spawner adapters for the detached reconciler sweep.
//!
//! The store is also the substrate for the integration test suite; a
//! production deployment would implement [`domain_ledger::LedgerStore`]
//! over its database instead.

pub mod spawner;
pub mod store;

pub use spawner::{QueuedSpawner, TokioSpawner};
pub use store::InMemoryLedger;
