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

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, Trim, Writer};
use expense_split_rs::{Expense, ExpenseError, Group, MemberId, RoundingPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Expense Split - Settle shared expenses from a CSV file
///
/// Reads expenses from a CSV file and writes either the settlement plan or
/// the net balance of every member to stdout.
#[derive(Parser, Debug)]
#[command(name = "expense-split-rs")]
#[command(about = "Works out who owes whom from a CSV of shared expenses", long_about = None)]
struct Args {
    /// Path to CSV file with expenses
    ///
    /// Expected format: id,amount,payer,split,created_at
    /// Example: cargo run -- -m alice,bob,carol expenses.csv > transfers.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Current group members, comma separated
    #[arg(short, long, env = "EXPENSE_SPLIT_MEMBERS", value_delimiter = ',', required = true)]
    members: Vec<String>,

    /// Which report to write
    #[arg(long, env = "EXPENSE_SPLIT_REPORT", value_enum, default_value_t = Report::Transfers)]
    report: Report,

    /// Log filter (e.g. `warn`, `debug`, `expense_split_rs=trace`)
    #[arg(long, env = "EXPENSE_SPLIT_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Report {
    /// `from,to,amount` rows that settle every debt
    Transfers,
    /// `member,balance` rows, positive when owed
    Balances,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .with_writer(std::io::stderr)
        .init();

    let group = match Group::new(args.members.iter().map(|m| m.trim()).filter(|m| !m.is_empty())) {
        Ok(group) => group,
        Err(e) => {
            tracing::error!("invalid members: {e}");
            process::exit(1);
        }
    };

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("error opening file '{}': {e}", args.input.display());
            process::exit(1);
        }
    };

    let expenses = match read_expenses(BufReader::new(file)) {
        Ok(expenses) => expenses,
        Err(e) => {
            tracing::error!("error reading expenses: {e}");
            process::exit(1);
        }
    };
    tracing::info!(
        members = group.members().len(),
        expenses = expenses.len(),
        "loaded snapshot"
    );

    let result = match args.report {
        Report::Transfers => write_transfers(&group, &expenses, std::io::stdout()),
        Report::Balances => write_balances(&group, &expenses, std::io::stdout()),
    };
    if let Err(e) = result {
        tracing::error!("error writing output: {e}");
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `id, amount, payer, split, created_at`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    id: String,
    amount: Decimal,
    payer: String,
    #[serde(default)]
    split: String,
    created_at: DateTime<Utc>,
}

impl CsvRecord {
    /// Converts the CSV record to a validated [`Expense`].
    ///
    /// An empty `split` column means the whole group shares the expense.
    fn into_expense(self) -> Result<Expense, ExpenseError> {
        let split: BTreeSet<MemberId> = self
            .split
            .split(|c: char| c == ';' || c.is_whitespace())
            .filter(|id| !id.is_empty())
            .map(MemberId::from)
            .collect();
        let split = (!split.is_empty()).then_some(split);

        Expense::new(self.id, self.amount, self.payer, split, self.created_at)
    }
}

/// Read expenses from a CSV reader.
///
/// Malformed rows and rows that fail validation are logged and skipped.
///
/// # CSV Format
///
/// Expected columns: `id, amount, payer, split, created_at`
/// - `id`: Expense ID
/// - `amount`: Positive decimal amount
/// - `payer`: Member ID of whoever paid
/// - `split`: Member IDs separated by spaces or `;` (empty for everyone)
/// - `created_at`: RFC 3339 timestamp
///
/// # Example
///
/// ```csv
/// id,amount,payer,split,created_at
/// e1,90.00,alice,,2025-03-01T12:00:00Z
/// e2,12.50,bob,alice;bob,2025-03-01T19:30:00Z
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
pub fn read_expenses<R: Read>(reader: R) -> Result<Vec<Expense>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut expenses = Vec::new();
    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let id = record.id.clone();
                match record.into_expense() {
                    Ok(expense) => expenses.push(expense),
                    Err(e) => tracing::warn!(expense = %id, "skipping expense: {e}"),
                }
            }
            Err(e) => {
                tracing::warn!("skipping malformed row: {e}");
                continue;
            }
        }
    }

    Ok(expenses)
}

#[derive(Debug, Serialize)]
struct BalanceRow<'a> {
    member: &'a MemberId,
    balance: Decimal,
}

/// Write the settlement plan as CSV.
///
/// # CSV Format
///
/// Columns: `from, to, amount`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_transfers<W: Write>(
    group: &Group,
    expenses: &[Expense],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for transfer in group.settlements(expenses) {
        wtr.serialize(&transfer)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every member's balance as CSV, rounded to cents.
///
/// # CSV Format
///
/// Columns: `member, balance`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_balances<W: Write>(
    group: &Group,
    expenses: &[Expense],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for (member, balance) in group.balances(expenses).iter() {
        wtr.serialize(BalanceRow {
            member,
            balance: RoundingPolicy::round(balance),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
