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

//! Settlement planning.
//!
//! [`plan_settlements`] turns balances into a short list of direct payments
//! using greedy matching:
//!
//! ```text
//!  debtors  (largest debt first)      creditors (largest credit first)
//!  ┌──────────┐                       ┌──────────┐
//!  │ head     │ ──min(debt, credit)─► │ head     │
//!  └──────────┘                       └──────────┘
//!  advance whichever side reached zero (both if both did)
//! ```
//!
//! Equal amounts are ordered by ascending member ID, so the plan is the same
//! for the same balances no matter how they were collected. Each step
//! retires at least one member, which bounds the plan at `k - 1` transfers
//! for `k` unsettled members.

use crate::balance::Balances;
use crate::base::MemberId;
use crate::rounding::RoundingPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A single directed payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

impl Transfer {
    pub fn new(from: impl Into<MemberId>, to: impl Into<MemberId>, amount: Decimal) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Outstanding amount of one side of the matching.
#[derive(Debug)]
struct Position<'a> {
    member: &'a MemberId,
    remaining: Decimal,
}

fn sort_positions(positions: &mut [Position<'_>]) {
    positions.sort_by(|a, b| {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.member.cmp(b.member))
    });
}

/// Plans the transfers that settle `balances`.
///
/// Members within [`RoundingPolicy::EPSILON`] of zero are already settled
/// and never appear. Transfer amounts are rounded to cents when emitted.
pub fn plan_settlements(balances: &Balances) -> Vec<Transfer> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for (member, balance) in balances.iter() {
        if balance < -RoundingPolicy::EPSILON {
            debtors.push(Position {
                member,
                remaining: -balance,
            });
        } else if balance > RoundingPolicy::EPSILON {
            creditors.push(Position {
                member,
                remaining: balance,
            });
        }
    }

    sort_positions(&mut debtors);
    sort_positions(&mut creditors);

    let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &debtors[i];
        let creditor = &creditors[j];
        let settle = RoundingPolicy::round(debtor.remaining.min(creditor.remaining));

        if settle > RoundingPolicy::EPSILON {
            trace!(from = %debtor.member, to = %creditor.member, amount = %settle, "transfer");
            transfers.push(Transfer {
                from: debtor.member.clone(),
                to: creditor.member.clone(),
                amount: settle,
            });
        }

        debtors[i].remaining -= settle;
        creditors[j].remaining -= settle;

        // The smaller side always lands within half a cent of zero.
        let debtor_done = RoundingPolicy::is_settled(debtors[i].remaining);
        let creditor_done = RoundingPolicy::is_settled(creditors[j].remaining);
        if debtor_done {
            i += 1;
        }
        if creditor_done {
            j += 1;
        }
    }

    transfers
}
