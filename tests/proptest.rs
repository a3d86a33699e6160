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

//! Property-based tests for the balance and settlement engine.
//!
//! These tests verify invariants that should hold for any snapshot of
//! valid expenses and for any balance mapping.

use chrono::{TimeZone, Utc};
use expense_split_rs::{
    Balances, Expense, MemberId, RoundingPolicy, compute_balances, plan_settlements,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive amount (0.01 to 10000 with 2 decimal places).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate a signed balance (-10000 to 10000 with 4 decimal places).
fn arb_balance() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=100_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

/// Raw expense shape: amount, payer index, split bitmask (0 = whole group).
fn arb_expense_parts() -> impl Strategy<Value = (Decimal, usize, u8)> {
    (arb_amount(), 0usize..8, any::<u8>())
}

fn member_ids(count: usize) -> Vec<MemberId> {
    (0..count).map(|i| MemberId::new(format!("m{i}"))).collect()
}

fn build_expenses(members: &[MemberId], parts: &[(Decimal, usize, u8)]) -> Vec<Expense> {
    let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    parts
        .iter()
        .enumerate()
        .map(|(i, (amount, payer_idx, mask))| {
            let payer = members[payer_idx % members.len()].clone();
            let split = if *mask == 0 {
                None
            } else {
                let mut split: BTreeSet<MemberId> = members
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1u8 << (bit % 8)) != 0)
                    .map(|(_, m)| m.clone())
                    .collect();
                if split.is_empty() {
                    split.insert(payer.clone());
                }
                Some(split)
            };
            Expense::new(format!("e{i}"), *amount, payer, split, created_at).unwrap()
        })
        .collect()
}

fn apply(balances: &Balances, transfers: &[expense_split_rs::Transfer]) -> BTreeMap<MemberId, Decimal> {
    let mut left: BTreeMap<MemberId, Decimal> =
        balances.iter().map(|(m, b)| (m.clone(), b)).collect();
    for transfer in transfers {
        *left.get_mut(&transfer.from).unwrap() += transfer.amount;
        *left.get_mut(&transfer.to).unwrap() -= transfer.amount;
    }
    left
}

// =============================================================================
// Balance Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Balances always sum to zero when every ID is a current member.
    #[test]
    fn balances_sum_to_zero(
        member_count in 1usize..=8,
        parts in prop::collection::vec(arb_expense_parts(), 0..30),
    ) {
        let members = member_ids(member_count);
        let expenses = build_expenses(&members, &parts);

        let balances = compute_balances(&members, &expenses);
        prop_assert!(balances.total().abs() <= RoundingPolicy::ZERO_SUM_TOLERANCE);
        prop_assert_eq!(balances.len(), member_count);
    }

    /// Identical input yields identical output.
    #[test]
    fn balances_are_idempotent(
        member_count in 1usize..=8,
        parts in prop::collection::vec(arb_expense_parts(), 0..30),
    ) {
        let members = member_ids(member_count);
        let expenses = build_expenses(&members, &parts);

        let first = compute_balances(&members, &expenses);
        let second = compute_balances(&members, &expenses);
        prop_assert_eq!(first, second);
    }

    /// Expenses from former members leave the rest of the snapshot untouched.
    #[test]
    fn stale_expenses_are_ignored(
        member_count in 2usize..=8,
        parts in prop::collection::vec(arb_expense_parts(), 0..20),
        stale_amount in arb_amount(),
    ) {
        let members = member_ids(member_count);
        let mut expenses = build_expenses(&members, &parts);
        let baseline = compute_balances(&members, &expenses);

        let split: BTreeSet<MemberId> = [MemberId::from("former")].into_iter().collect();
        let created_at = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
        expenses.push(Expense::new("stale", stale_amount, "former", Some(split), created_at).unwrap());

        let balances = compute_balances(&members, &expenses);
        prop_assert_eq!(&balances, &baseline);
        prop_assert!(balances.is_zero_sum());
    }

    /// Equal shares always add back up to the exact amount.
    #[test]
    fn allocation_conserves_amount(
        amount in arb_amount(),
        parts in 1usize..=50,
    ) {
        let shares = RoundingPolicy::allocate_shares(amount, parts);
        prop_assert_eq!(shares.len(), parts);
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), amount);

        let max = shares.iter().max().copied().unwrap_or_default();
        let min = shares.iter().min().copied().unwrap_or_default();
        prop_assert!(max - min <= RoundingPolicy::EPSILON);
    }
}

// =============================================================================
// Settlement Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// At most k - 1 transfers for k unsettled members, for any mapping.
    #[test]
    fn transfer_count_is_bounded(
        amounts in prop::collection::vec(arb_balance(), 0..12),
    ) {
        let balances: Balances = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| (MemberId::new(format!("m{i}")), *amount))
            .collect();

        let transfers = plan_settlements(&balances);
        prop_assert!(transfers.len() <= balances.unsettled().saturating_sub(1));
    }

    /// Every transfer moves more than one cent between distinct members,
    /// from someone who owes to someone who is owed.
    #[test]
    fn transfers_are_well_formed(
        amounts in prop::collection::vec(arb_balance(), 0..12),
    ) {
        let balances: Balances = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| (MemberId::new(format!("m{i}")), *amount))
            .collect();

        for transfer in plan_settlements(&balances) {
            prop_assert!(transfer.amount > RoundingPolicy::EPSILON);
            prop_assert!(transfer.amount.scale() == RoundingPolicy::MONEY_SCALE);
            prop_assert_ne!(&transfer.from, &transfer.to);
            prop_assert!(balances.get(&transfer.from).unwrap() < Decimal::ZERO);
            prop_assert!(balances.get(&transfer.to).unwrap() > Decimal::ZERO);
        }
    }

    /// Applying the plan leaves every member within a few cents of zero.
    #[test]
    fn plan_settles_computed_balances(
        member_count in 1usize..=8,
        parts in prop::collection::vec(arb_expense_parts(), 0..30),
    ) {
        let members = member_ids(member_count);
        let expenses = build_expenses(&members, &parts);
        let balances = compute_balances(&members, &expenses);

        let transfers = plan_settlements(&balances);
        let bound = RoundingPolicy::EPSILON * Decimal::from(member_count);
        for residual in apply(&balances, &transfers).values() {
            prop_assert!(residual.abs() <= bound, "residual {} exceeds {}", residual, bound);
        }
    }

    /// Member and expense order never changes the plan.
    #[test]
    fn plan_is_order_independent(
        member_count in 1usize..=8,
        parts in prop::collection::vec(arb_expense_parts(), 0..20),
    ) {
        let members = member_ids(member_count);
        let expenses = build_expenses(&members, &parts);

        let mut reversed_members = members.clone();
        reversed_members.reverse();
        let mut reversed_expenses = expenses.clone();
        reversed_expenses.reverse();

        let forward = plan_settlements(&compute_balances(&members, &expenses));
        let backward = plan_settlements(&compute_balances(&reversed_members, &reversed_expenses));
        prop_assert_eq!(forward, backward);
    }
}
