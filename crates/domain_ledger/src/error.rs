//! Ledger domain errors

use core_kernel::{MoneyError, PortError, UserId};
use thiserror::Error;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Split/pay inputs don't reconcile, or reference a non-member
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced user/group/bill does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Settlement requested for a pair with nothing pending
    #[error("No balance pending between {user} and {other}")]
    NoBalance { user: UserId, other: UserId },

    /// Money arithmetic failure (currency mismatch, bad divisor)
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Failure in the persistence/task collaborator
    #[error("Port error: {0}")]
    Port(PortError),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LedgerError::NotFound(message.into())
    }

    /// Returns true if the error is the benign "nothing to settle" outcome
    pub fn is_no_balance(&self) -> bool {
        matches!(self, LedgerError::NoBalance { .. })
    }
}

impl From<PortError> for LedgerError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                LedgerError::NotFound(format!("{} {}", entity_type, id))
            }
            other => LedgerError::Port(other),
        }
    }
}
