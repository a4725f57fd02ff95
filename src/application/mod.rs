// Application layer - use cases over the in-memory repository.
// `LedgerService` owns the state machine; `SharedLedger` puts it behind a lock.

pub mod error;
mod reporting;
mod service;
mod shared;

pub use error::*;
pub use reporting::*;
pub use service::*;
pub use shared::*;
