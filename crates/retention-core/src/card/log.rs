//! Review records exchanged with collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::CardState;
use crate::fsrs::Rating;

/// Raw review submitted by a study session
///
/// The rating stays a plain integer here; it is validated when the event is
/// applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewEvent {
    /// Card being reviewed
    pub card_id: String,
    /// Rating 1-4
    pub rating: u8,
    /// When the answer was given
    pub timestamp: DateTime<Utc>,
    /// Time spent on the card
    #[serde(default)]
    pub duration_ms: u64,
}

/// Immutable record of one applied review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub card_id: String,
    pub rating: Rating,
    /// State before this review
    pub state: CardState,
    /// Due date chosen by this review
    pub due: DateTime<Utc>,
    /// Stability after this review
    pub stability: f64,
    /// Difficulty after this review
    pub difficulty: f64,
    /// Days since the previous review
    pub elapsed_days: f64,
    /// Elapsed days recorded by the previous review
    pub last_elapsed_days: f64,
    /// Interval that had been scheduled before this review
    pub scheduled_days: u32,
    /// When the review happened
    pub review: DateTime<Utc>,
    /// Milliseconds spent answering
    pub duration: u64,
}

impl ReviewLog {
    /// Whether the card was recalled
    #[inline]
    pub fn is_success(&self) -> bool {
        self.rating.is_success()
    }
}

/// Per-review payload for the reward system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub card_id: String,
    pub rating: Rating,
    /// First review of the card
    pub is_new_card: bool,
    pub duration_ms: u64,
    /// Difficulty after the review
    pub card_difficulty: f64,
}
