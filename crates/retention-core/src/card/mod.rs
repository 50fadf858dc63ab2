//! Card module - scheduling records
//!
//! - `Card` with explicit never-reviewed state
//! - `ReviewLog` append-only history entries
//! - `ReviewEvent` / `ReviewOutcome` collaborator payloads

mod log;
mod model;

pub use log::{ReviewEvent, ReviewLog, ReviewOutcome};
pub use model::{Card, CardState, MemoryState};
