// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use rust_decimal_macros::dec;
use settleup::application::LedgerSnapshot;
use settleup::domain::{BalanceSheet, Currency, Expense, Split, Transfer, UserId};
use std::path::PathBuf;
use tempfile::TempDir;

pub fn users(names: &[&str]) -> Vec<UserId> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Write a snapshot as JSON into a fresh temporary directory.
pub fn write_snapshot(snapshot: &LedgerSnapshot) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("ledger.json");
    std::fs::write(&path, serde_json::to_string_pretty(snapshot)?)?;
    Ok((path, temp_dir))
}

/// Apply every transfer, in order, to a copy of the balances.
pub fn apply_all(balances: &BalanceSheet, transfers: &[Transfer]) -> Result<BalanceSheet> {
    let mut settled = balances.clone();
    for transfer in transfers {
        settled.apply(transfer)?;
    }
    Ok(settled)
}

/// Number of users holding a non-zero balance in a currency.
pub fn nonzero_count(balances: &BalanceSheet, currency: &Currency) -> usize {
    balances
        .for_currency(currency)
        .iter()
        .filter(|(_, balance)| !balance.is_zero())
        .count()
}

/// Test fixture: a group of friends sharing a trip
pub struct TripLedger;

impl TripLedger {
    pub fn participants() -> Vec<UserId> {
        users(&["alice", "bob", "carol", "dave"])
    }

    /// A mix of split types across USD and EUR.
    pub fn expenses() -> Vec<Expense> {
        vec![
            Expense::new("alice", "USD", dec!(120), Split::EqualAll).with_title("Hotel"),
            Expense::new("bob", "USD", dec!(45), Split::equal_subset(["alice", "bob", "carol"]))
                .with_title("Dinner"),
            Expense::new(
                "carol",
                "EUR",
                dec!(60),
                Split::custom([("alice", dec!(10)), ("bob", dec!(20)), ("dave", dec!(30))]),
            )
            .with_title("Museum"),
            Expense::new("dave", "EUR", dec!(10), Split::EqualAll).with_title("Coffee"),
            Expense::new("dave", "USD", dec!(0.10), Split::equal_subset(["alice", "bob", "carol"])),
        ]
    }

    pub fn snapshot() -> LedgerSnapshot {
        LedgerSnapshot::new(Self::participants(), Self::expenses())
    }
}
