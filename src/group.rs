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

//! Group membership snapshot.

use crate::balance::{Balances, compute_balances};
use crate::base::MemberId;
use crate::error::GroupError;
use crate::expense::Expense;
use crate::settlement::{Transfer, plan_settlements};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// Current members of a group, sorted and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Group {
    members: Vec<MemberId>,
}

/// Everything a caller needs to render a group's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of every expense amount, including ones paid by former members.
    pub total_spent: Decimal,
    pub balances: Balances,
    pub transfers: Vec<Transfer>,
}

impl Group {
    /// Builds a group from its member IDs.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::NoMembers`] if `members` is empty.
    pub fn new<I, M>(members: I) -> Result<Self, GroupError>
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        let members: BTreeSet<MemberId> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Err(GroupError::NoMembers);
        }
        Ok(Self {
            members: members.into_iter().collect(),
        })
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.binary_search(member).is_ok()
    }

    pub fn balances(&self, expenses: &[Expense]) -> Balances {
        compute_balances(&self.members, expenses)
    }

    pub fn settlements(&self, expenses: &[Expense]) -> Vec<Transfer> {
        plan_settlements(&self.balances(expenses))
    }

    /// Computes balances, the settlement plan and the total spent in one pass.
    pub fn summarize(&self, expenses: &[Expense]) -> Summary {
        let balances = self.balances(expenses);
        let transfers = plan_settlements(&balances);
        let total_spent = expenses.iter().map(Expense::amount).sum();
        Summary {
            total_spent,
            balances,
            transfers,
        }
    }
}
