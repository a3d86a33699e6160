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

//! # Expense Split
//!
//! This library works out who owes whom in a group that shares expenses.
//! Each expense is paid by one member and divided equally among some or all
//! of the group; the engine derives every member's net balance and then a
//! short, deterministic list of transfers that settles all debts.
//!
//! ## Core Components
//!
//! - [`compute_balances`]: Net balance per member from a snapshot of expenses
//! - [`plan_settlements`]: Greedy debtor/creditor matching into [`Transfer`]s
//! - [`RoundingPolicy`]: Tolerance, share allocation and cent rounding
//! - [`Expense`] and [`Group`]: Validated input snapshots
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use expense_split_rs::{Expense, Group, MemberId, Transfer, plan_settlements};
//! use rust_decimal_macros::dec;
//!
//! let group = Group::new(["a", "b", "c", "d"]).unwrap();
//! let hotel = Expense::new("e1", dec!(100), "a", None, Utc::now()).unwrap();
//!
//! let balances = group.balances(&[hotel]);
//! assert_eq!(balances.get(&MemberId::from("a")), Some(dec!(75)));
//!
//! let transfers = plan_settlements(&balances);
//! assert_eq!(
//!     transfers,
//!     vec![
//!         Transfer::new("b", "a", dec!(25.00)),
//!         Transfer::new("c", "a", dec!(25.00)),
//!         Transfer::new("d", "a", dec!(25.00)),
//!     ]
//! );
//! ```
//!
//! ## Thread Safety
//!
//! Both engine functions are pure: they only read their arguments and keep
//! no state between calls, so they can be invoked from any number of threads.

mod balance;
mod base;
pub mod error;
mod expense;
mod group;
mod rounding;
mod settlement;

pub use balance::{Balances, compute_balances};
pub use base::{ExpenseId, MemberId};
pub use error::{ExpenseError, GroupError};
pub use expense::Expense;
pub use group::{Group, Summary};
pub use rounding::RoundingPolicy;
pub use settlement::{Transfer, plan_settlements};
