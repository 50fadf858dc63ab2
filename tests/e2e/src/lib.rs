//! End-to-end test support for retention-core
//!
//! - `harness`: in-memory deck standing in for the storage collaborator
//! - `mocks`: fixture factory for common card scenarios

pub mod harness;

pub use harness::TestDeck;
pub use mocks::{TestDataFactory, TestScenario};
