use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BalanceSheet, Currency, Transfer, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub currencies: Vec<CurrencyBalances>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBalances {
    pub currency: Currency,
    pub balances: Vec<UserBalance>,
    /// Sum of all balances in this currency; zero for a conserved ledger.
    /// Absent when the sum is out of range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub user: UserId,
    pub balance: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub balances: BalanceReport,
    pub transfers: Vec<Transfer>,
}

impl BalanceReport {
    /// Group a balance sheet by currency, users in name order.
    pub fn from_sheet(sheet: &BalanceSheet) -> Self {
        let currencies = sheet
            .currencies()
            .into_iter()
            .map(|currency| CurrencyBalances {
                balances: sheet
                    .for_currency(&currency)
                    .into_iter()
                    .map(|(user, balance)| UserBalance { user, balance })
                    .collect(),
                total: sheet.total(&currency),
                currency,
            })
            .collect();

        Self { currencies }
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}
