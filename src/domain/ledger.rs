use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;
use thiserror::Error;

use super::{Amount, Currency, Expense, ExpenseId, Transfer, UserId};

/// Net position of every participant, per currency.
/// Positive: the group owes this user. Negative: this user owes the group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    balances: BTreeMap<(UserId, Currency), Amount>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance for a user in a currency; zero if never referenced.
    pub fn get(&self, user: &str, currency: &Currency) -> Amount {
        self.balances
            .get(&(user.to_string(), currency.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn credit(&mut self, user: &str, currency: &Currency, amount: Amount) -> Result<(), LedgerError> {
        self.adjust(user, currency, |balance| balance.checked_add(amount))
    }

    pub fn debit(&mut self, user: &str, currency: &Currency, amount: Amount) -> Result<(), LedgerError> {
        self.adjust(user, currency, |balance| balance.checked_sub(amount))
    }

    fn adjust(
        &mut self,
        user: &str,
        currency: &Currency,
        op: impl FnOnce(Amount) -> Option<Amount>,
    ) -> Result<(), LedgerError> {
        let balance = self
            .balances
            .entry((user.to_string(), currency.clone()))
            .or_insert(Decimal::ZERO);
        *balance = op(*balance).ok_or_else(|| LedgerError::Overflow {
            user: user.to_string(),
            currency: currency.clone(),
        })?;
        Ok(())
    }

    /// Apply a settlement payment: the payer's debt shrinks, the payee's credit shrinks.
    pub fn apply(&mut self, transfer: &Transfer) -> Result<(), LedgerError> {
        self.credit(&transfer.from, &transfer.currency, transfer.amount)?;
        self.debit(&transfer.to, &transfer.currency, transfer.amount)
    }

    /// Every currency with at least one entry, in code order.
    pub fn currencies(&self) -> Vec<Currency> {
        self.balances
            .keys()
            .map(|(_, currency)| currency.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(user, balance)` pairs for one currency, ordered by user.
    pub fn for_currency(&self, currency: &Currency) -> Vec<(UserId, Amount)> {
        self.balances
            .iter()
            .filter(|((_, c), _)| c == currency)
            .map(|((user, _), balance)| (user.clone(), *balance))
            .collect()
    }

    /// Sum of all balances in a currency. Zero for a conserved ledger, `None` if the
    /// sum does not fit in an `Amount`.
    pub fn total(&self, currency: &Currency) -> Option<Amount> {
        self.balances
            .iter()
            .filter(|((_, c), _)| c == currency)
            .try_fold(Decimal::ZERO, |acc, (_, balance)| acc.checked_add(*balance))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &Currency, Amount)> {
        self.balances
            .iter()
            .map(|((user, currency), balance)| (user, currency, *balance))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Collects `(user, currency, balance)` triples; a repeated key keeps the last balance.
impl<U, C> FromIterator<(U, C, Amount)> for BalanceSheet
where
    U: Into<UserId>,
    C: Into<Currency>,
{
    fn from_iter<I: IntoIterator<Item = (U, C, Amount)>>(iter: I) -> Self {
        let balances = iter
            .into_iter()
            .map(|(user, currency, amount)| ((user.into(), currency.into()), amount))
            .collect();
        Self { balances }
    }
}

/// Compute net balances for every participant and currency from a set of expenses.
///
/// The payer is credited the nominal amount; every participant (the payer included,
/// if they take part) is debited their resolved share. Nothing is rounded for display.
/// Expenses that resolve to no participants are skipped. An empty participant list
/// yields an empty sheet.
pub fn aggregate(
    expenses: &[Expense],
    all_participants: &[UserId],
) -> Result<BalanceSheet, LedgerError> {
    let mut sheet = BalanceSheet::new();
    if all_participants.is_empty() {
        return Ok(sheet);
    }

    let registered: HashSet<&str> = all_participants.iter().map(String::as_str).collect();

    for expense in expenses {
        let shares = expense.resolve_shares(all_participants);
        if shares.is_empty() {
            continue;
        }

        if !registered.contains(expense.payer.as_str()) {
            return Err(LedgerError::UnknownParticipant {
                expense: expense.id,
                user: expense.payer.clone(),
            });
        }
        if let Some(share) = shares
            .iter()
            .find(|share| !registered.contains(share.participant.as_str()))
        {
            return Err(LedgerError::UnknownParticipant {
                expense: expense.id,
                user: share.participant.clone(),
            });
        }

        sheet.credit(&expense.payer, &expense.currency, expense.amount)?;
        for share in &shares {
            sheet.debit(&share.participant, &expense.currency, share.amount)?;
        }
    }

    Ok(sheet)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Expense {expense} references unregistered participant '{user}'")]
    UnknownParticipant { expense: ExpenseId, user: UserId },

    #[error("Balance of '{user}' in {currency} is out of range")]
    Overflow { user: UserId, currency: Currency },
}
