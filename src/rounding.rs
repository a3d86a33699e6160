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

//! Numeric tolerance and rounding rules shared by balances and settlements.
//!
//! Two rules live here:
//!
//! - **Allocation**: an expense is divided into equal shares expressed in
//!   whole minor units, so the shares always add back up to the exact
//!   amount. The leftover units are handed out one each, in the order the
//!   caller supplies (ascending member ID in practice).
//! - **Emission**: a transfer amount is rounded to [`RoundingPolicy::MONEY_SCALE`]
//!   decimals, half away from zero, only when the transfer is produced.
//!
//! # Example
//!
//! ```
//! use expense_split_rs::RoundingPolicy;
//! use rust_decimal_macros::dec;
//!
//! let shares = RoundingPolicy::allocate_shares(dec!(100), 3);
//! assert_eq!(shares, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
//! assert_eq!(shares.iter().sum::<rust_decimal::Decimal>(), dec!(100));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Fixed rounding and tolerance policy for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingPolicy;

impl RoundingPolicy {
    /// One minor currency unit. Balances and remainders at or below this
    /// magnitude count as settled.
    pub const EPSILON: Decimal = dec!(0.01);

    /// Decimal places of the currency's minor unit.
    pub const MONEY_SCALE: u32 = 2;

    /// Largest acceptable drift of the balance total away from zero.
    pub const ZERO_SUM_TOLERANCE: Decimal = dec!(0.000000001);

    /// Rounds an amount to the money scale, half away from zero.
    ///
    /// The result always carries exactly [`Self::MONEY_SCALE`] decimal places,
    /// so `25` renders as `25.00`.
    pub fn round(amount: Decimal) -> Decimal {
        let mut rounded = amount
            .round_dp_with_strategy(Self::MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::MONEY_SCALE);
        rounded
    }

    /// Returns `true` when `amount` is within [`Self::EPSILON`] of zero.
    pub fn is_settled(amount: Decimal) -> bool {
        amount.abs() <= Self::EPSILON
    }

    /// Splits `amount` into `parts` equal shares that sum exactly to `amount`.
    ///
    /// Shares are whole units of the money scale, or of the amount's own
    /// scale when it is finer. When the amount does not divide evenly, the
    /// first `remainder` shares carry one extra unit each.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `parts` is zero; empty split sets are rejected
    /// before an expense reaches the engine.
    pub fn allocate_shares(amount: Decimal, parts: usize) -> Vec<Decimal> {
        debug_assert!(parts > 0, "allocate_shares called with zero parts");
        if parts == 0 {
            return Vec::new();
        }

        let scale = amount.scale().max(Self::MONEY_SCALE);
        let mut scaled = amount;
        scaled.rescale(scale);

        let units = scaled.mantissa();
        let count = parts as i128;
        let base = units / count;
        let remainder = (units % count) as usize;

        (0..parts)
            .map(|i| {
                let share_units = if i < remainder { base + 1 } else { base };
                Decimal::from_i128_with_scale(share_units, scale)
            })
            .collect()
    }
}
