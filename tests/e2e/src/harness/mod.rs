//! Test harness

mod deck;

pub use deck::TestDeck;
