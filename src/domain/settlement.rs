use rust_decimal::Decimal;
use thiserror::Error;

use super::{Amount, BalanceSheet, Currency, Transfer, UserId, DEFAULT_TOLERANCE};

/// Tuning for the settlement planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementConfig {
    /// Balances below this magnitude count as settled
    pub tolerance: Amount,
}

impl SettlementConfig {
    /// Negative tolerances make no sense and are clamped to zero.
    pub fn with_tolerance(tolerance: Amount) -> Self {
        Self {
            tolerance: tolerance.max(Decimal::ZERO),
        }
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Greedy largest-debtor / largest-creditor settlement.
///
/// Each currency is settled on its own. Balances are sorted ascending (ties broken
/// by user), then a two-pointer sweep pairs the largest remaining debtor with the
/// largest remaining creditor until the pointers meet. At most `k - 1` transfers are
/// emitted for `k` users holding a non-zero balance. Pairings that would move no
/// more than the tolerance are absorbed without a transfer. This is not guaranteed to be the
/// minimum number of transfers; finding that is NP-hard.
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner {
    config: SettlementConfig,
}

impl SettlementPlanner {
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    /// Plan transfers that zero every balance, currency by currency.
    /// Output is grouped by currency (in code order), then in sweep order.
    pub fn plan(&self, balances: &BalanceSheet) -> Result<Vec<Transfer>, SettlementError> {
        let mut transfers = Vec::new();
        for currency in balances.currencies() {
            let entries = balances.for_currency(&currency);
            transfers.extend(self.plan_currency(&currency, entries)?);
        }
        Ok(transfers)
    }

    /// Plan transfers for a single currency from `(user, balance)` pairs.
    pub fn plan_currency(
        &self,
        currency: &Currency,
        entries: Vec<(UserId, Amount)>,
    ) -> Result<Vec<Transfer>, SettlementError> {
        let tolerance = self.config.tolerance;

        let imbalance = entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, balance)| acc.checked_add(*balance))
            .ok_or_else(|| SettlementError::Overflow {
                currency: currency.clone(),
            })?;
        if imbalance.abs() > tolerance {
            return Err(SettlementError::NotConserved {
                currency: currency.clone(),
                imbalance,
            });
        }

        let mut working: Vec<(UserId, Amount)> = entries
            .into_iter()
            .filter(|(_, balance)| !balance.is_zero())
            .collect();
        working.sort_by(|(user_a, a), (user_b, b)| a.cmp(b).then_with(|| user_a.cmp(user_b)));

        let mut transfers = Vec::new();
        if working.len() < 2 {
            return self.verify(currency, &working).map(|()| transfers);
        }

        // Every pairing zeroes at least one side exactly. Pairings at or below the
        // tolerance are not emitted, so the dust stays with the two users involved
        // instead of piling up on whoever is left at the end of the sweep.
        let mut i = 0;
        let mut j = working.len() - 1;
        while i < j {
            let debt = -working[i].1;
            let credit = working[j].1;
            if debt <= Decimal::ZERO || credit <= Decimal::ZERO {
                // One side is exhausted; what remains is the tolerated imbalance.
                break;
            }

            let settle_amount = debt.min(credit);
            if settle_amount > tolerance {
                transfers.push(Transfer::new(
                    working[i].0.clone(),
                    working[j].0.clone(),
                    currency.clone(),
                    settle_amount,
                ));
            }

            working[i].1 += settle_amount;
            working[j].1 -= settle_amount;

            if working[i].1.is_zero() {
                i += 1;
            }
            if working[j].1.is_zero() {
                j -= 1;
            }
        }

        self.verify(currency, &working).map(|()| transfers)
    }

    /// Every balance left after the sweep must be within tolerance.
    fn verify(&self, currency: &Currency, working: &[(UserId, Amount)]) -> Result<(), SettlementError> {
        match working
            .iter()
            .find(|(_, balance)| balance.abs() > self.config.tolerance)
        {
            Some((user, residual)) => Err(SettlementError::Unbalanced {
                currency: currency.clone(),
                user: user.clone(),
                residual: *residual,
            }),
            None => Ok(()),
        }
    }
}

/// Plan transfers with the default tolerance.
pub fn plan(balances: &BalanceSheet) -> Result<Vec<Transfer>, SettlementError> {
    SettlementPlanner::default().plan(balances)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("Balances in {currency} do not sum to zero (off by {imbalance})")]
    NotConserved { currency: Currency, imbalance: Amount },

    #[error("Balances in {currency} are too large to add up")]
    Overflow { currency: Currency },

    #[error("{user} still holds {residual} {currency} after settlement")]
    Unbalanced {
        currency: Currency,
        user: UserId,
        residual: Amount,
    },
}
