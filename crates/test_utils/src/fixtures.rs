//! Canonical fixtures for ledger tests
//!
//! Small, deterministic building blocks; randomized display data comes from
//! `fake` so dumps stay readable without tests depending on the values.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, UserId};
use domain_ledger::{Group, Membership, User};

/// Common money amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A bill that divides evenly among three members
    pub fn divisible_bill() -> Money {
        Money::new(dec!(90.00), Currency::INR)
    }

    /// A bill that leaves one cent over when split three ways
    pub fn awkward_bill() -> Money {
        Money::new(dec!(10.00), Currency::INR)
    }
}

/// Fabricated display data
pub struct StringFixtures;

impl StringFixtures {
    /// A random person name
    pub fn person_name() -> String {
        Name().fake()
    }

    /// A random email address
    pub fn email() -> String {
        SafeEmail().fake()
    }
}

/// A user with fabricated display data
pub fn user() -> User {
    User::new(
        UserId::new(),
        StringFixtures::person_name(),
        StringFixtures::email(),
    )
}

/// A group with its members, pre-wired memberships included
pub struct GroupFixture {
    pub group: Group,
    pub members: Vec<User>,
    pub memberships: Vec<Membership>,
}

impl GroupFixture {
    /// A group of `n` members; the first member is the creator
    ///
    /// Members are sorted by user id so tests can reason about netting
    /// tie-breaks.
    pub fn with_members(name: &str, n: usize) -> Self {
        let mut members: Vec<User> = (0..n).map(|_| user()).collect();
        members.sort_by_key(|u| u.id);

        let group = Group::new(name, members[0].id);
        let memberships = members
            .iter()
            .map(|member| Membership::new(member.id, group.id))
            .collect();

        Self {
            group,
            members,
            memberships,
        }
    }

    /// Same group, but with simplified payments switched on
    pub fn simplified(name: &str, n: usize) -> Self {
        let mut fixture = Self::with_members(name, n);
        fixture.group.simplify_payments = true;
        fixture
    }

    /// The member ids, in membership order
    pub fn member_ids(&self) -> Vec<UserId> {
        self.members.iter().map(|m| m.id).collect()
    }
}
