//! Card - the unit the scheduler owns
//!
//! Each card carries:
//! - Its learning state (New/Learning/Review/Relearning)
//! - FSRS memory state, absent until the first review
//! - Scheduling bookkeeping (due date, intervals, counters)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, RetentionError};
use crate::fsrs::{
    elapsed_days_between, retrievability, MAX_DIFFICULTY, MIN_DIFFICULTY,
};

// ============================================================================
// CARD STATE
// ============================================================================

/// Where a card sits in its learning lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    /// Never reviewed
    #[default]
    New,
    /// First review went badly, still being acquired
    Learning,
    /// Graduated, scheduled on the forgetting curve
    Review,
    /// Forgotten after having been learned
    Relearning,
}

impl CardState {
    /// All states, in lifecycle order
    pub const ALL: [CardState; 4] = [
        CardState::New,
        CardState::Learning,
        CardState::Review,
        CardState::Relearning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardState::New => "new",
            CardState::Learning => "learning",
            CardState::Review => "review",
            CardState::Relearning => "relearning",
        }
    }
}

impl FromStr for CardState {
    type Err = RetentionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "new" => Ok(CardState::New),
            "learning" => Ok(CardState::Learning),
            "review" => Ok(CardState::Review),
            "relearning" => Ok(CardState::Relearning),
            _ => Err(RetentionError::InvalidCard(format!("unknown state: {}", s))),
        }
    }
}

impl std::fmt::Display for CardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// MEMORY STATE
// ============================================================================

/// FSRS memory parameters of a reviewed card
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryState {
    /// Days until retrievability decays to 90%
    pub stability: f64,
    /// Intrinsic difficulty (1.0 = easy, 10.0 = hard)
    pub difficulty: f64,
}

impl MemoryState {
    /// Probability of recall after `elapsed_days`
    #[inline]
    pub fn retrievability(&self, elapsed_days: f64) -> f64 {
        retrievability(elapsed_days, self.stability)
    }
}

// ============================================================================
// CARD
// ============================================================================

/// A flashcard's scheduling record
///
/// `memory` is `None` exactly while the card is `New`, so averages over
/// reviewed cards cannot pick up placeholder values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier (UUID v4 unless supplied by the caller)
    pub id: String,
    /// Stability/difficulty, absent until first reviewed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryState>,
    /// Next scheduled review
    pub due: DateTime<Utc>,
    /// Most recent review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    /// Days between the two most recent reviews
    #[serde(default)]
    pub elapsed_days: f64,
    /// Interval chosen at the most recent review
    #[serde(default)]
    pub scheduled_days: u32,
    /// Completed reviews
    #[serde(default)]
    pub reps: u32,
    /// Again ratings on an already reviewed card
    #[serde(default)]
    pub lapses: u32,
    /// Lifecycle state
    #[serde(default)]
    pub state: CardState,
}

impl Card {
    /// Create a new, never reviewed card that is due immediately
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), now)
    }

    /// Create a new card with a caller supplied id
    pub fn with_id(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            memory: None,
            due: now,
            last_review: None,
            elapsed_days: 0.0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            state: CardState::New,
        }
    }

    /// Rebuild a card from stored fields, rejecting inconsistent records
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: impl Into<String>,
        state: CardState,
        memory: Option<MemoryState>,
        due: DateTime<Utc>,
        last_review: Option<DateTime<Utc>>,
        elapsed_days: f64,
        scheduled_days: u32,
        reps: u32,
        lapses: u32,
    ) -> Result<Self> {
        let card = Self {
            id: id.into(),
            memory,
            due,
            last_review,
            elapsed_days,
            scheduled_days,
            reps,
            lapses,
            state,
        };
        card.validate()?;
        Ok(card)
    }

    /// Check the record's invariants
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RetentionError::InvalidCard(msg));

        match (self.state, &self.memory, self.last_review) {
            (CardState::New, None, None) => {}
            (CardState::New, _, _) => {
                return invalid(format!("{}: new card carries review history", self.id));
            }
            (state, None, _) => {
                return invalid(format!("{}: {} card has no memory state", self.id, state));
            }
            (state, Some(_), None) => {
                return invalid(format!("{}: {} card has no last review", self.id, state));
            }
            (_, Some(_), Some(_)) => {}
        }

        if let Some(memory) = &self.memory {
            if !(memory.stability.is_finite() && memory.stability > 0.0) {
                return invalid(format!("{}: stability {} must be > 0", self.id, memory.stability));
            }
            if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&memory.difficulty) {
                return invalid(format!(
                    "{}: difficulty {} outside [{}, {}]",
                    self.id, memory.difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY
                ));
            }
        }

        if !(self.elapsed_days.is_finite() && self.elapsed_days >= 0.0) {
            return invalid(format!("{}: elapsed days {} must be >= 0", self.id, self.elapsed_days));
        }

        Ok(())
    }

    /// Whether the card has never been reviewed
    #[inline]
    pub fn is_new(&self) -> bool {
        self.memory.is_none()
    }

    /// Memory state, or `UninitializedCardAccess` for a new card
    pub fn memory_state(&self) -> Result<MemoryState> {
        self.memory
            .ok_or_else(|| RetentionError::UninitializedCardAccess(self.id.clone()))
    }

    pub fn stability(&self) -> Option<f64> {
        self.memory.map(|m| m.stability)
    }

    pub fn difficulty(&self) -> Option<f64> {
        self.memory.map(|m| m.difficulty)
    }

    /// Days since the last review as of `now`
    pub fn days_since_review(&self, now: DateTime<Utc>) -> Option<f64> {
        self.last_review.map(|last| elapsed_days_between(last, now))
    }

    /// Retrievability at `now`, recomputed from stability and elapsed time.
    ///
    /// Fails with `UninitializedCardAccess` for a never reviewed card.
    pub fn retrievability(&self, now: DateTime<Utc>) -> Result<f64> {
        let memory = self.memory_state()?;
        let elapsed = self.days_since_review(now).unwrap_or(0.0);
        Ok(memory.retrievability(elapsed))
    }

    /// Retrievability at `now`, `None` for a never reviewed card
    pub fn current_retrievability(&self, now: DateTime<Utc>) -> Option<f64> {
        self.retrievability(now).ok()
    }

    /// Check if the card is due at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }

    /// Check if the card has lapsed often enough to need rework
    pub fn is_leech(&self, threshold: u32) -> bool {
        threshold > 0 && self.lapses >= threshold
    }
}

// ============================================================================
// TESTS
// ============================================================================
