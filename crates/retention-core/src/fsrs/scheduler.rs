//! Card state machine
//!
//! Applies a rating to a card and produces the card's next state, the review
//! log entry and the reward payload. Cards are never mutated in place: the
//! scheduler takes `&Card` and returns a new one, so callers decide how to
//! serialize concurrent reviews of the same card.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::algorithm::{
    elapsed_days_between, initial_difficulty_with_weights, initial_stability_with_weights,
    next_difficulty_with_weights, next_forget_stability_with_weights,
    next_recall_stability_with_weights, Rating, DEFAULT_RETENTION, FSRS4_WEIGHTS,
};
use super::interval::{
    fuzz_interval, fuzz_seed, next_interval, DEFAULT_MAXIMUM_INTERVAL, DEFAULT_MINIMUM_INTERVAL,
};
use crate::card::{Card, CardState, MemoryState, ReviewEvent, ReviewLog, ReviewOutcome};
use crate::error::{Result, RetentionError};

/// Default lapse count at which a card is flagged as a leech
pub const DEFAULT_LEECH_THRESHOLD: u32 = 8;

/// Default relative fuzz applied to intervals
pub const DEFAULT_FUZZ_FACTOR: f64 = 0.05;

/// Largest fuzz factor that keeps short intervals ordered
pub const MAX_FUZZ_FACTOR: f64 = 0.1;

// ============================================================================
// CONFIG
// ============================================================================

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// FSRS v4 weights
    pub weights: [f64; 17],
    /// Target probability of recall at the due date
    pub desired_retention: f64,
    /// Shortest interval in days
    pub minimum_interval: u32,
    /// Longest interval in days
    pub maximum_interval: u32,
    /// Spread due dates with deterministic per-card fuzz
    pub enable_fuzz: bool,
    /// Maximum relative fuzz (0.05 = +/-5%)
    pub fuzz_factor: f64,
    /// Lapses at which a card counts as a leech
    pub leech_threshold: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weights: FSRS4_WEIGHTS,
            desired_retention: DEFAULT_RETENTION,
            minimum_interval: DEFAULT_MINIMUM_INTERVAL,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzz: true,
            fuzz_factor: DEFAULT_FUZZ_FACTOR,
            leech_threshold: DEFAULT_LEECH_THRESHOLD,
        }
    }
}

impl SchedulerConfig {
    /// Check that every field is in range
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RetentionError::InvalidConfig(msg));

        if !(self.desired_retention > 0.0 && self.desired_retention < 1.0) {
            return invalid(format!(
                "desired retention {} must be in (0, 1)",
                self.desired_retention
            ));
        }
        if self.minimum_interval < 1 {
            return invalid("minimum interval must be at least 1 day".to_string());
        }
        if self.maximum_interval < self.minimum_interval {
            return invalid(format!(
                "maximum interval {} below minimum {}",
                self.maximum_interval, self.minimum_interval
            ));
        }
        if !(0.0..=MAX_FUZZ_FACTOR).contains(&self.fuzz_factor) {
            return invalid(format!(
                "fuzz factor {} must be in [0, {}]",
                self.fuzz_factor, MAX_FUZZ_FACTOR
            ));
        }
        if let Some((i, w)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return invalid(format!("weight w{} = {} must be finite and >= 0", i, w));
        }
        if self.weights[..4].iter().any(|w| *w <= 0.0) {
            return invalid("initial stabilities w0..w3 must be > 0".to_string());
        }
        Ok(())
    }

    /// Parse a JSON config, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RetentionError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Everything produced by one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    /// Card after the review
    pub card: Card,
    /// Log entry to append
    pub log: ReviewLog,
    /// Payload for the reward system
    pub outcome: ReviewOutcome,
    /// Interval chosen (days)
    pub interval: u32,
    /// This review pushed the card over the leech threshold
    pub became_leech: bool,
}

/// Candidate results for every rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResults {
    pub again: ReviewResult,
    pub hard: ReviewResult,
    pub good: ReviewResult,
    pub easy: ReviewResult,
}

impl PreviewResults {
    /// Result for one rating
    pub fn get(&self, rating: Rating) -> &ReviewResult {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// FSRS card scheduler
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get current configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Apply a raw review event to its card
    pub fn apply_event(&self, card: &Card, event: &ReviewEvent) -> Result<ReviewResult> {
        if event.card_id != card.id {
            return Err(RetentionError::CardMismatch {
                expected: card.id.clone(),
                actual: event.card_id.clone(),
            });
        }
        let rating = Rating::try_from(event.rating)?;
        self.review(card, rating, event.timestamp, event.duration_ms)
    }

    /// Apply `rating` to `card` at `now`
    pub fn apply_review(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> Result<ReviewResult> {
        self.review(card, rating, now, 0)
    }

    /// Results for all four ratings at `now`, without committing any
    pub fn preview(&self, card: &Card, now: DateTime<Utc>) -> Result<PreviewResults> {
        Ok(PreviewResults {
            again: self.apply_review(card, Rating::Again, now)?,
            hard: self.apply_review(card, Rating::Hard, now)?,
            good: self.apply_review(card, Rating::Good, now)?,
            easy: self.apply_review(card, Rating::Easy, now)?,
        })
    }

    /// Interval in days for a stability under the configured retention,
    /// before fuzz
    pub fn interval_for(&self, stability: f64) -> u32 {
        next_interval(
            stability,
            self.config.desired_retention,
            self.config.minimum_interval,
            self.config.maximum_interval,
        )
    }

    fn review(
        &self,
        card: &Card,
        rating: Rating,
        now: DateTime<Utc>,
        duration_ms: u64,
    ) -> Result<ReviewResult> {
        card.validate()?;
        if let Some(last_review) = card.last_review {
            if now < last_review {
                return Err(RetentionError::NonMonotonicReviewTime { last_review, now });
            }
        }

        let w = &self.config.weights;
        let previous_state = card.state;
        let elapsed_days = card
            .last_review
            .map(|last| elapsed_days_between(last, now))
            .unwrap_or(0.0);

        let (memory, state, lapses) = match card.memory {
            None => {
                let memory = MemoryState {
                    stability: initial_stability_with_weights(rating, w),
                    difficulty: initial_difficulty_with_weights(rating, w),
                };
                let state = match rating {
                    Rating::Again | Rating::Hard => CardState::Learning,
                    Rating::Good | Rating::Easy => CardState::Review,
                };
                (memory, state, card.lapses)
            }
            Some(current) => {
                let r = current.retrievability(elapsed_days);
                let difficulty = next_difficulty_with_weights(current.difficulty, rating, w);
                if rating.is_success() {
                    let stability = next_recall_stability_with_weights(
                        current.difficulty,
                        current.stability,
                        r,
                        rating,
                        w,
                    );
                    (MemoryState { stability, difficulty }, CardState::Review, card.lapses)
                } else {
                    let stability = next_forget_stability_with_weights(
                        current.difficulty,
                        current.stability,
                        r,
                        w,
                    );
                    (
                        MemoryState { stability, difficulty },
                        CardState::Relearning,
                        card.lapses + 1,
                    )
                }
            }
        };

        let reps = card.reps + 1;
        let mut interval = self.interval_for(memory.stability);
        if self.config.enable_fuzz {
            interval = fuzz_interval(
                interval,
                self.config.fuzz_factor,
                fuzz_seed(&card.id, reps),
                self.config.minimum_interval,
                self.config.maximum_interval,
            );
        }
        let due = now + Duration::days(interval as i64);

        let updated = Card {
            id: card.id.clone(),
            memory: Some(memory),
            due,
            last_review: Some(now),
            elapsed_days,
            scheduled_days: interval,
            reps,
            lapses,
            state,
        };

        let log = ReviewLog {
            card_id: card.id.clone(),
            rating,
            state: previous_state,
            due,
            stability: memory.stability,
            difficulty: memory.difficulty,
            elapsed_days,
            last_elapsed_days: card.elapsed_days,
            scheduled_days: card.scheduled_days,
            review: now,
            duration: duration_ms,
        };

        let outcome = ReviewOutcome {
            card_id: card.id.clone(),
            rating,
            is_new_card: previous_state == CardState::New,
            duration_ms,
            card_difficulty: memory.difficulty,
        };

        let threshold = self.config.leech_threshold;
        let became_leech = !card.is_leech(threshold) && updated.is_leech(threshold);
        if became_leech {
            tracing::warn!(
                card_id = %card.id,
                lapses = updated.lapses,
                threshold,
                "Card crossed leech threshold"
            );
        }

        tracing::debug!(
            card_id = %card.id,
            %rating,
            from = %previous_state,
            to = %state,
            stability = memory.stability,
            difficulty = memory.difficulty,
            interval,
            "Review applied"
        );

        Ok(ReviewResult {
            card: updated,
            log,
            outcome,
            interval,
            became_leech,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
