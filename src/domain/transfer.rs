use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{format_amount, Amount, Currency, UserId};

/// A recommended payment: `from` pays `to` this amount in this currency.
/// Transfers are produced by the settlement planner and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Debtor (balance increases when paid)
    pub from: UserId,
    /// Creditor (balance decreases when paid)
    pub to: UserId,
    pub currency: Currency,
    /// Always positive
    pub amount: Amount,
}

impl Transfer {
    pub fn new(
        from: impl Into<UserId>,
        to: impl Into<UserId>,
        currency: impl Into<Currency>,
        amount: Amount,
    ) -> Self {
        assert!(amount > Decimal::ZERO, "Transfer amount must be positive");
        Self {
            from: from.into(),
            to: to.into(),
            currency: currency.into(),
            amount,
        }
    }

    /// Amount rounded to two decimal places for display.
    pub fn display_amount(&self) -> String {
        format_amount(self.amount)
    }
}

impl std::fmt::Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pays {} {} {}",
            self.from,
            self.to,
            self.currency,
            self.display_amount()
        )
    }
}

/// Re-sort transfers into display order: by currency, then debtor, then creditor.
/// The sort is stable, so transfers with equal keys keep their planned order.
pub fn sort_canonical(transfers: &mut [Transfer]) {
    transfers.sort_by(|a, b| {
        a.currency
            .cmp(&b.currency)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_create_transfer() {
        let transfer = Transfer::new("bob", "alice", "usd", dec!(33.3333));

        assert_eq!(transfer.from, "bob");
        assert_eq!(transfer.to, "alice");
        assert_eq!(transfer.currency, Currency::new("USD"));
        assert_eq!(transfer.amount, dec!(33.3333));
        assert_eq!(transfer.display_amount(), "33.33");
    }

    #[test]
    fn test_display() {
        let transfer = Transfer::new("bob", "alice", "USD", dec!(33.3333));
        assert_eq!(transfer.to_string(), "bob pays alice USD 33.33");
    }

    #[test]
    #[should_panic(expected = "Transfer amount must be positive")]
    fn test_transfer_requires_positive_amount() {
        Transfer::new("bob", "alice", "USD", Decimal::ZERO);
    }

    #[test]
    fn test_sort_canonical() {
        let mut transfers = vec![
            Transfer::new("carol", "alice", "USD", dec!(5)),
            Transfer::new("bob", "alice", "USD", dec!(7)),
            Transfer::new("dave", "bob", "EUR", dec!(2)),
            Transfer::new("bob", "carol", "USD", dec!(1)),
        ];

        sort_canonical(&mut transfers);

        let order: Vec<(&str, &str, &str)> = transfers
            .iter()
            .map(|t| (t.currency.as_str(), t.from.as_str(), t.to.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("EUR", "dave", "bob"),
                ("USD", "bob", "alice"),
                ("USD", "bob", "carol"),
                ("USD", "carol", "alice"),
            ]
        );
    }
}
