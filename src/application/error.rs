use thiserror::Error;

use crate::domain::{LedgerError, SettlementError};

/// Failures a settlement request can report to its caller.
/// Empty input is not an error: it settles to no transfers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// An expense references someone outside the registered group.
    #[error("Inconsistent ledger: {0}")]
    InconsistentLedger(#[from] LedgerError),

    /// Balances could not be zeroed; an upstream invariant was broken.
    #[error("Settlement invariant violated: {0}")]
    InvariantViolation(#[from] SettlementError),
}
