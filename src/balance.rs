// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Net balance per member.
//!
//! [`compute_balances`] folds a snapshot of expenses into a signed position
//! for every current member:
//!
//! - The payer is credited the full amount.
//! - Each participant is debited an equal share, allocated in whole minor
//!   units by [`RoundingPolicy::allocate_shares`].
//! - IDs that are no longer in the group are skipped, not rejected.
//!
//! Positive means the member is owed money, negative means they owe.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use expense_split_rs::{Expense, MemberId, compute_balances};
//! use rust_decimal_macros::dec;
//!
//! let members: Vec<MemberId> = ["a", "b", "c"].into_iter().map(MemberId::from).collect();
//! let dinner = Expense::new("e1", dec!(90), "a", None, Utc::now()).unwrap();
//!
//! let balances = compute_balances(&members, &[dinner]);
//! assert_eq!(balances.get(&MemberId::from("a")), Some(dec!(60)));
//! assert_eq!(balances.get(&MemberId::from("b")), Some(dec!(-30)));
//! ```

use crate::base::MemberId;
use crate::expense::Expense;
use crate::rounding::RoundingPolicy;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// Signed net position of every member, ordered by member ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    inner: BTreeMap<MemberId, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the member's balance, or `None` if they are not tracked.
    pub fn get(&self, member: &MemberId) -> Option<Decimal> {
        self.inner.get(member).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Decimal)> {
        self.inner.iter().map(|(member, balance)| (member, *balance))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sum of every balance. Zero for any snapshot without stale IDs.
    pub fn total(&self) -> Decimal {
        self.inner.values().copied().sum()
    }

    /// Returns `true` when [`Self::total`] is within the zero-sum tolerance.
    pub fn is_zero_sum(&self) -> bool {
        self.total().abs() <= RoundingPolicy::ZERO_SUM_TOLERANCE
    }

    /// Number of members whose balance is outside the settled band.
    pub fn unsettled(&self) -> usize {
        self.inner
            .values()
            .filter(|balance| !RoundingPolicy::is_settled(**balance))
            .count()
    }
}

/// Later entries for the same member replace earlier ones.
impl FromIterator<(MemberId, Decimal)> for Balances {
    fn from_iter<I: IntoIterator<Item = (MemberId, Decimal)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Balances {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (member, balance) in &self.inner {
            map.serialize_entry(member, &RoundingPolicy::round(*balance))?;
        }
        map.end()
    }
}

/// Computes each current member's net balance over `expenses`.
///
/// Expenses without an explicit split are shared by all of `members`.
/// Payers and participants missing from `members` contribute nothing.
/// Balances are accumulated exactly; rounding only happens when shares are
/// allocated and when transfers are emitted.
pub fn compute_balances(members: &[MemberId], expenses: &[Expense]) -> Balances {
    let mut balances: BTreeMap<MemberId, Decimal> = members
        .iter()
        .map(|member| (member.clone(), Decimal::ZERO))
        .collect();
    let mut skipped = false;

    for expense in expenses {
        let participants = expense.participants(members);
        debug_assert!(
            !participants.is_empty(),
            "expense {} reached the calculator without participants",
            expense.id()
        );
        let shares = RoundingPolicy::allocate_shares(expense.amount(), participants.len());

        match balances.get_mut(expense.payer()) {
            Some(balance) => *balance += expense.amount(),
            None => {
                debug!(
                    expense = %expense.id(),
                    payer = %expense.payer(),
                    "skipping credit for payer outside the group"
                );
                skipped = true;
            }
        }

        for (member, share) in participants.into_iter().zip(shares) {
            match balances.get_mut(member) {
                Some(balance) => *balance -= share,
                None => {
                    debug!(
                        expense = %expense.id(),
                        member = %member,
                        "skipping share for member outside the group"
                    );
                    skipped = true;
                }
            }
        }
    }

    let balances = Balances { inner: balances };
    debug_assert!(
        skipped || balances.is_zero_sum(),
        "Invariant violated: balances sum to {}",
        balances.total()
    );
    balances
}
