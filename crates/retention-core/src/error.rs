//! Error types for the scheduling engine.

use chrono::{DateTime, Utc};

/// Error raised by scheduling, card validation and strict analytics.
///
/// State mutations reject invalid input with one of these variants. The
/// analytics functions only surface `DegenerateAggregateInput` through their
/// `checked_*` variants; the plain versions return a neutral value instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RetentionError {
    /// Rating outside 1..=4
    #[error("Invalid rating: {0} (expected 1-4)")]
    InvalidRating(u8),
    /// Review timestamp precedes the card's last review
    #[error("Review at {now} precedes last review at {last_review}")]
    NonMonotonicReviewTime {
        /// The card's most recent review
        last_review: DateTime<Utc>,
        /// The rejected review time
        now: DateTime<Utc>,
    },
    /// Memory state requested for a card that was never reviewed
    #[error("Card {0} has never been reviewed")]
    UninitializedCardAccess(String),
    /// Aggregate requested over an empty base
    #[error("No input to aggregate: {0}")]
    DegenerateAggregateInput(&'static str),
    /// Review event addressed to a different card
    #[error("Review event for card {actual} applied to card {expected}")]
    CardMismatch {
        /// Id of the card being reviewed
        expected: String,
        /// Id carried by the event
        actual: String,
    },
    /// Card record violates its invariants
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    /// Configuration out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for the scheduling engine
pub type Result<T> = std::result::Result<T, RetentionError>;
