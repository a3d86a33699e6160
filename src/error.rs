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

//! Error types for expense and group ingestion.
//!
//! The balance and settlement functions never fail. Everything that can go
//! wrong is caught here, before a record enters the engine.

use thiserror::Error;

/// Reasons an expense record is rejected at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    /// Expense ID is empty
    #[error("missing expense ID")]
    MissingId,

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Payer ID is empty
    #[error("missing payer")]
    MissingPayer,

    /// Explicit split set has no members
    #[error("split set must contain at least one member")]
    EmptySplit,
}

/// Reasons a group snapshot is rejected at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// Membership is empty
    #[error("group must have at least one member")]
    NoMembers,
}
