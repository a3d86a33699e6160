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

//! Expense records.
//!
//! An [`Expense`] can only be built through [`Expense::new`], which is also
//! the path taken by deserialization. Once built it is immutable, so the
//! balance calculator can rely on a positive amount and a non-empty split.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use expense_split_rs::{Expense, ExpenseError, MemberId};
//! use rust_decimal_macros::dec;
//! use std::collections::BTreeSet;
//!
//! let empty = Expense::new("e1", dec!(10), "alice", Some(BTreeSet::new()), Utc::now());
//! assert_eq!(empty.unwrap_err(), ExpenseError::EmptySplit);
//!
//! let dinner = Expense::new("e2", dec!(90), "alice", None, Utc::now()).unwrap();
//! assert_eq!(dinner.payer(), &MemberId::from("alice"));
//! ```

use crate::base::{ExpenseId, MemberId};
use crate::error::ExpenseError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A validated shared expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRecord")]
pub struct Expense {
    id: ExpenseId,
    amount: Decimal,
    payer: MemberId,
    /// `None` means "everyone in the group at calculation time".
    split: Option<BTreeSet<MemberId>>,
    created_at: DateTime<Utc>,
}

/// Wire shape of an expense before validation.
#[derive(Debug, Deserialize)]
struct ExpenseRecord {
    id: ExpenseId,
    amount: Decimal,
    payer: MemberId,
    split: Option<BTreeSet<MemberId>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = ExpenseError;

    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        Expense::new(
            record.id,
            record.amount,
            record.payer,
            record.split,
            record.created_at,
        )
    }
}

impl Expense {
    /// Builds an expense, validating the fields the engine depends on.
    ///
    /// # Errors
    ///
    /// - [`ExpenseError::MissingId`] - `id` is empty.
    /// - [`ExpenseError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`ExpenseError::MissingPayer`] - `payer` is empty.
    /// - [`ExpenseError::EmptySplit`] - `split` is `Some` but has no members.
    pub fn new(
        id: impl Into<ExpenseId>,
        amount: Decimal,
        payer: impl Into<MemberId>,
        split: Option<BTreeSet<MemberId>>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ExpenseError> {
        let id = id.into();
        let payer = payer.into();

        if id.0.is_empty() {
            return Err(ExpenseError::MissingId);
        }
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::InvalidAmount);
        }
        if payer.0.is_empty() {
            return Err(ExpenseError::MissingPayer);
        }
        if split.as_ref().is_some_and(|members| members.is_empty()) {
            return Err(ExpenseError::EmptySplit);
        }

        Ok(Self {
            id,
            amount,
            payer,
            split,
            created_at,
        })
    }

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    /// The explicit split set, if one was recorded.
    pub fn split(&self) -> Option<&BTreeSet<MemberId>> {
        self.split.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Resolves who shares this expense, in ascending member ID order.
    ///
    /// Falls back to the whole of `members` when no split set was recorded.
    pub fn participants<'a>(&'a self, members: &'a [MemberId]) -> Vec<&'a MemberId> {
        match &self.split {
            Some(split) => split.iter().collect(),
            None => {
                let everyone: BTreeSet<&MemberId> = members.iter().collect();
                everyone.into_iter().collect()
            }
        }
    }
}
