mod expense;
mod ledger;
mod money;
mod settlement;
mod transfer;

pub use expense::*;
pub use ledger::*;
pub use money::*;
pub use settlement::*;
pub use transfer::*;
