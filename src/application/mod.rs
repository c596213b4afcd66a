// Application layer - use cases and orchestration.
// Each request runs against one ledger snapshot supplied by the caller;
// the service holds configuration only, never ledger state.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
