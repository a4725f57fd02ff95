pub mod export;
pub mod script;

pub use export::{Exporter, LedgerSnapshot};
pub use script::{ReplayError, ReplayReport, ScriptOp, ScriptRunner};
