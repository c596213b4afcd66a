use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    aggregate, format_amount, BalanceSheet, Expense, SettlementConfig, SettlementPlanner,
    Transfer, UserId,
};

use super::{AppError, BalanceReport, SettlementReport};

/// One consistent view of a group's ledger, fetched once by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Every registered participant of the group
    pub participants: Vec<UserId>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl LedgerSnapshot {
    pub fn new(participants: Vec<UserId>, expenses: Vec<Expense>) -> Self {
        Self {
            participants,
            expenses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty() || self.expenses.is_empty()
    }
}

/// Result of settling a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementResult {
    /// Net balances before any transfer is made
    pub balances: BalanceSheet,
    /// Recommended payments, grouped by currency in sweep order
    pub transfers: Vec<Transfer>,
}

impl SettlementResult {
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn report(&self) -> SettlementReport {
        SettlementReport {
            balances: BalanceReport::from_sheet(&self.balances),
            transfers: self.transfers.clone(),
        }
    }
}

/// Application service computing balances and settlements for a ledger snapshot.
/// Stateless between calls; safe to share across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct SettlementService {
    planner: SettlementPlanner,
}

impl SettlementService {
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            planner: SettlementPlanner::new(config),
        }
    }

    /// Net balance per participant and currency.
    pub fn balances(&self, snapshot: &LedgerSnapshot) -> Result<BalanceSheet, AppError> {
        debug!(
            participants = snapshot.participants.len(),
            expenses = snapshot.expenses.len(),
            "aggregating ledger snapshot"
        );
        if snapshot.is_empty() {
            return Ok(BalanceSheet::new());
        }

        for expense in &snapshot.expenses {
            if expense.resolve_shares(&snapshot.participants).is_empty() {
                warn!(expense = %expense.id, "expense has no participants, skipping");
            }
            if let Some(difference) = expense.share_total_mismatch() {
                warn!(
                    expense = %expense.id,
                    amount = %format_amount(expense.amount),
                    difference = %format_amount(difference),
                    "custom shares do not add up to the expense amount"
                );
            }
        }

        Ok(aggregate(&snapshot.expenses, &snapshot.participants)?)
    }

    /// Net balances grouped for display.
    pub fn balance_report(&self, snapshot: &LedgerSnapshot) -> Result<BalanceReport, AppError> {
        let balances = self.balances(snapshot)?;
        Ok(BalanceReport::from_sheet(&balances))
    }

    /// Aggregate the snapshot and plan the transfers that settle it.
    pub fn settle(&self, snapshot: &LedgerSnapshot) -> Result<SettlementResult, AppError> {
        let balances = self.balances(snapshot)?;
        let transfers = self.planner.plan(&balances)?;

        for currency in balances.currencies() {
            debug!(
                %currency,
                transfers = transfers.iter().filter(|t| t.currency == currency).count(),
                "planned settlement"
            );
        }

        Ok(SettlementResult {
            balances,
            transfers,
        })
    }
}
