//! Session state: the dataset, rule store, weights and derived errors,
//! changed only through [`AppState::dispatch`].

mod fixes;
mod mutation;
mod state;

pub use fixes::{FixStatus, FixToken, FixTracker, PendingFix};
pub use mutation::Mutation;
pub use state::{AppState, ExportSnapshot, ImportSummary, SearchHit};
