//! Audit stamps and the soft-delete capability
//!
//! Every persisted entity carries creation/update timestamps and a deletion
//! flag. Deletion is flag-and-filter: rows are never physically removed, and
//! adapters exclude flagged rows from every query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation/update timestamps plus the soft-delete flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamps {
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
    /// Whether the record has been soft-deleted
    pub is_deleted: bool,
    /// When the record was soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AuditStamps {
    /// Creates stamps for a freshly created record
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Records an update to the entity
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Flags the entity as deleted
    pub fn mark_deleted(&mut self) {
        let now = Utc::now();
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

impl Default for AuditStamps {
    fn default() -> Self {
        Self::now()
    }
}

/// Capability implemented by every soft-deletable entity
///
/// Adapters must filter `is_deleted()` rows out of query results; the domain
/// layer never sees a deleted record.
pub trait SoftDelete {
    /// Returns the entity's audit stamps
    fn stamps(&self) -> &AuditStamps;

    /// Returns the entity's audit stamps mutably
    fn stamps_mut(&mut self) -> &mut AuditStamps;

    /// Whether the entity has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.stamps().is_deleted
    }

    /// Flags the entity as deleted without removing the row
    fn mark_deleted(&mut self) {
        self.stamps_mut().mark_deleted();
    }
}

/// Implements [`SoftDelete`] for an entity with a `stamps: AuditStamps` field
#[macro_export]
macro_rules! impl_soft_delete {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl $crate::audit::SoftDelete for $entity {
                fn stamps(&self) -> &$crate::audit::AuditStamps {
                    &self.stamps
                }

                fn stamps_mut(&mut self) -> &mut $crate::audit::AuditStamps {
                    &mut self.stamps
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        stamps: AuditStamps,
    }

    crate::impl_soft_delete!(Row);

    #[test]
    fn test_new_record_is_live() {
        let row = Row {
            stamps: AuditStamps::now(),
        };
        assert!(!row.is_deleted());
        assert!(row.stamps().deleted_at.is_none());
    }

    #[test]
    fn test_mark_deleted_sets_flag_and_timestamp() {
        let mut row = Row {
            stamps: AuditStamps::now(),
        };
        row.mark_deleted();
        assert!(row.is_deleted());
        assert!(row.stamps().deleted_at.is_some());
        assert!(row.stamps().updated_at >= row.stamps().created_at);
    }
}
