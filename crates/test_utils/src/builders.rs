//! Test data builders
//!
//! Builder patterns for constructing test data with sensible defaults, so
//! tests specify only the fields they care about.

use rust_decimal::Decimal;

use core_kernel::UserId;
use domain_ledger::{SplitPolicy, SplitRequest};

/// Builder for [`SplitRequest`] inputs
///
/// Defaults to an equal split of the whole group with a single payer.
pub struct SplitRequestBuilder {
    amount: Decimal,
    policy: SplitPolicy,
    paid_by: Vec<(UserId, Decimal)>,
    owed_by: Vec<(UserId, Decimal)>,
}

impl SplitRequestBuilder {
    /// Creates a builder for a bill of `amount` paid entirely by `payer`
    pub fn equal_paid_by(payer: UserId, amount: Decimal) -> Self {
        Self {
            amount,
            policy: SplitPolicy::Equal,
            paid_by: vec![(payer, amount)],
            owed_by: Vec::new(),
        }
    }

    /// Creates an empty builder for `amount`
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            policy: SplitPolicy::Equal,
            paid_by: Vec::new(),
            owed_by: Vec::new(),
        }
    }

    /// Sets the split policy
    pub fn with_policy(mut self, policy: SplitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Appends a payer contribution
    pub fn paid(mut self, user: UserId, amount: Decimal) -> Self {
        self.paid_by.push((user, amount));
        self
    }

    /// Appends an owed-by entry (amount, percentage, or equal-split marker
    /// depending on the policy)
    pub fn owed(mut self, user: UserId, value: Decimal) -> Self {
        self.owed_by.push((user, value));
        self
    }

    /// Builds the request
    pub fn build(self) -> SplitRequest {
        SplitRequest {
            amount: self.amount,
            policy: self.policy,
            paid_by: self.paid_by,
            owed_by: self.owed_by,
        }
    }
}
