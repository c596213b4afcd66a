use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Amount, Currency, UserId};

pub type ExpenseId = Uuid;

/// Decimal places kept for an equal share before the remainder goes to the last
/// participant. Leaves enough headroom in the 96-bit mantissa for sums to stay exact.
pub const SHARE_SCALE: u32 = 12;

/// One participant's declared portion of a custom split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub participant: UserId,
    pub amount: Amount,
}

impl Share {
    pub fn new(participant: impl Into<UserId>, amount: Amount) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }
}

/// How an expense is divided among the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Split {
    /// Evenly among every registered participant of the group
    EqualAll,
    /// Evenly among the named participants only
    EqualSubset { participants: Vec<UserId> },
    /// Explicit per-participant shares, used as-is
    Custom { shares: Vec<Share> },
}

impl Split {
    pub fn equal_subset<I, S>(participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        Split::EqualSubset {
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn custom<I, S>(shares: I) -> Self
    where
        I: IntoIterator<Item = (S, Amount)>,
        S: Into<UserId>,
    {
        Split::Custom {
            shares: shares
                .into_iter()
                .map(|(participant, amount)| Share::new(participant, amount))
                .collect(),
        }
    }

    /// Custom split with a service-charge multiplier applied to every share.
    /// The multiplier must lie strictly between 1 and 2 (e.g. 1.1 for a 10% charge).
    pub fn custom_with_multiplier<I, S>(shares: I, multiplier: Amount) -> Result<Self, ExpenseError>
    where
        I: IntoIterator<Item = (S, Amount)>,
        S: Into<UserId>,
    {
        if multiplier <= Decimal::ONE || multiplier >= Decimal::from(2) {
            return Err(ExpenseError::InvalidMultiplier(multiplier));
        }
        let shares = shares
            .into_iter()
            .map(|(participant, amount)| {
                amount
                    .checked_mul(multiplier)
                    .map(|charged| Share::new(participant, charged))
                    .ok_or(ExpenseError::Overflow(amount))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Split::Custom { shares })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::EqualAll => "equal_all",
            Split::EqualSubset { .. } => "equal_subset",
            Split::Custom { .. } => "custom",
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bill fronted by one participant on behalf of some of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Human-readable label, e.g. "Dinner at Lau Pa Sat"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Who fronted the money
    pub payer: UserId,
    pub currency: Currency,
    /// Nominal total the payer is credited with
    pub amount: Amount,
    pub split: Split,
}

impl Expense {
    pub fn new(
        payer: impl Into<UserId>,
        currency: impl Into<Currency>,
        amount: Amount,
        split: Split,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: None,
            payer: payer.into(),
            currency: currency.into(),
            amount,
            split,
        }
    }

    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = id;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Resolve each participant's share of this expense.
    ///
    /// Equal splits divide the amount in decimal (to [`SHARE_SCALE`] places); the last
    /// participant absorbs the remainder so that the shares add up to exactly `amount`.
    /// Custom shares are returned as declared, even if they don't add up to `amount`.
    /// An empty result means the expense has nobody to charge.
    pub fn resolve_shares(&self, all_participants: &[UserId]) -> Vec<Share> {
        match &self.split {
            Split::EqualAll => equal_shares(self.amount, all_participants),
            Split::EqualSubset { participants } => equal_shares(self.amount, participants),
            Split::Custom { shares } => shares.clone(),
        }
    }

    /// For custom splits, how far the declared shares are from the nominal amount
    /// (`sum(shares) - amount`). `None` when they match, the split is equal, or the
    /// share total is out of range.
    pub fn share_total_mismatch(&self) -> Option<Amount> {
        let Split::Custom { shares } = &self.split else {
            return None;
        };
        let difference = shares
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.amount))?
            .checked_sub(self.amount)?;
        (!difference.is_zero()).then_some(difference)
    }
}

fn equal_shares(amount: Amount, participants: &[UserId]) -> Vec<Share> {
    let Some((last, rest)) = participants.split_last() else {
        return Vec::new();
    };

    let share = (amount / Decimal::from(participants.len()))
        .round_dp_with_strategy(SHARE_SCALE, RoundingStrategy::ToZero);
    let mut shares: Vec<Share> = rest
        .iter()
        .map(|participant| Share::new(participant.clone(), share))
        .collect();
    let allocated = share * Decimal::from(rest.len());
    shares.push(Share::new(last.clone(), amount - allocated));
    shares
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    #[error("Service charge multiplier must be between 1 and 2, got {0}")]
    InvalidMultiplier(Amount),

    #[error("Share of {0} is out of range once the service charge is applied")]
    Overflow(Amount),
}
