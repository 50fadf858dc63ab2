//! FSRS v4 core formulas
//!
//! Pure functions over `(difficulty, stability, retrievability, rating)`.
//! Nothing in here knows about cards, timestamps or configuration beyond the
//! weight vector.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RetentionError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Published FSRS v4 default weights (17 parameters)
///
/// | Index | Meaning                                   |
/// |-------|-------------------------------------------|
/// | 0..4  | initial stability for Again/Hard/Good/Easy|
/// | 4, 5  | initial difficulty base and slope         |
/// | 6     | difficulty step per rating                |
/// | 7     | mean reversion toward D0(Good)            |
/// | 8..11 | recall stability growth                   |
/// | 11..15| forget stability                          |
/// | 15    | Hard penalty                              |
/// | 16    | Easy bonus                                |
pub const FSRS4_WEIGHTS: [f64; 17] = [
    0.4, 0.6, 2.4, 5.8, 4.93, 0.94, 0.86, 0.01, 1.49, 0.14, 0.94, 2.18, 0.05, 0.34, 1.26, 0.29,
    2.61,
];

/// Forgetting curve scale: R(t) = (1 + t / (FACTOR * S))^-1
pub const CURVE_FACTOR: f64 = 9.0;

/// Lower bound on difficulty
pub const MIN_DIFFICULTY: f64 = 1.0;

/// Upper bound on difficulty
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Floor for initial and recall stability (days); lapses may go below it
pub const MIN_STABILITY: f64 = 0.01;

/// Ceiling for stability (days)
pub const MAX_STABILITY: f64 = 36500.0;

/// Default target retention
pub const DEFAULT_RETENTION: f64 = 0.9;

/// A lapse keeps at most this share of the previous stability
pub const MAX_FORGET_RATIO: f64 = 0.9;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ============================================================================
// RATING
// ============================================================================

/// Learner's self-assessed recall for one review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    /// Forgot the card
    Again = 1,
    /// Recalled with serious difficulty
    Hard = 2,
    /// Recalled after some hesitation
    Good = 3,
    /// Recalled effortlessly
    Easy = 4,
}

impl Rating {
    /// All ratings, in ascending order
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Numeric grade (1-4)
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether the card was recalled at all
    #[inline]
    pub fn is_success(self) -> bool {
        self != Rating::Again
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = RetentionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::Again),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(RetentionError::InvalidRating(other)),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// FORGETTING CURVE
// ============================================================================

/// Probability of recall after `elapsed_days` for a memory of `stability` days.
///
/// Negative elapsed time is treated as zero. A non-positive stability has no
/// meaningful curve; it reports full recall rather than dividing by zero.
#[inline]
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 1.0;
    }
    let t = elapsed_days.max(0.0);
    1.0 / (1.0 + t / (CURVE_FACTOR * stability))
}

/// Inverse of [`retrievability`]: days until recall probability falls to `target`.
#[inline]
pub fn interval_for_retention(stability: f64, target: f64) -> f64 {
    CURVE_FACTOR * stability * (1.0 / target - 1.0)
}

/// Fractional days between two instants (zero if `to` precedes `from`)
pub fn elapsed_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let seconds = (to - from).num_seconds().max(0) as f64;
    seconds / SECONDS_PER_DAY
}

// ============================================================================
// INITIAL STATE
// ============================================================================

/// Stability after the first review
pub fn initial_stability(rating: Rating) -> f64 {
    initial_stability_with_weights(rating, &FSRS4_WEIGHTS)
}

pub fn initial_stability_with_weights(rating: Rating, w: &[f64; 17]) -> f64 {
    w[rating.value() as usize - 1].clamp(MIN_STABILITY, MAX_STABILITY)
}

/// Difficulty after the first review
pub fn initial_difficulty(rating: Rating) -> f64 {
    initial_difficulty_with_weights(rating, &FSRS4_WEIGHTS)
}

pub fn initial_difficulty_with_weights(rating: Rating, w: &[f64; 17]) -> f64 {
    let g = rating.value() as f64;
    clamp_difficulty(w[4] - (g - 3.0) * w[5])
}

#[inline]
fn clamp_difficulty(d: f64) -> f64 {
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Difficulty after a review: Easy lowers it, Hard and Again raise it, with a
/// slight pull back toward the initial Good difficulty.
pub fn next_difficulty(difficulty: f64, rating: Rating) -> f64 {
    next_difficulty_with_weights(difficulty, rating, &FSRS4_WEIGHTS)
}

pub fn next_difficulty_with_weights(difficulty: f64, rating: Rating, w: &[f64; 17]) -> f64 {
    let g = rating.value() as f64;
    let stepped = difficulty - w[6] * (g - 3.0);
    let anchor = initial_difficulty_with_weights(Rating::Good, w);
    clamp_difficulty(w[7] * anchor + (1.0 - w[7]) * stepped)
}

/// Stability after a successful recall.
///
/// Growth increases with the rating, shrinks with difficulty and with the
/// current stability, and vanishes as retrievability at review time nears 1.
pub fn next_recall_stability(difficulty: f64, stability: f64, r: f64, rating: Rating) -> f64 {
    next_recall_stability_with_weights(difficulty, stability, r, rating, &FSRS4_WEIGHTS)
}

pub fn next_recall_stability_with_weights(
    difficulty: f64,
    stability: f64,
    r: f64,
    rating: Rating,
    w: &[f64; 17],
) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
    let growth = w[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-w[9])
        * ((w[10] * (1.0 - r)).exp() - 1.0)
        * hard_penalty
        * easy_bonus;
    (stability * (1.0 + growth)).clamp(MIN_STABILITY, MAX_STABILITY)
}

/// Stability after a lapse. Always strictly below the pre-lapse stability
/// and above zero; no floor applies, so tiny stabilities keep shrinking.
pub fn next_forget_stability(difficulty: f64, stability: f64, r: f64) -> f64 {
    next_forget_stability_with_weights(difficulty, stability, r, &FSRS4_WEIGHTS)
}

pub fn next_forget_stability_with_weights(
    difficulty: f64,
    stability: f64,
    r: f64,
    w: &[f64; 17],
) -> f64 {
    // (S + 1)^w13 - 1 via ln_1p/exp_m1 so tiny stabilities don't round to 0
    let forgotten = w[11]
        * difficulty.powf(-w[12])
        * (w[13] * stability.ln_1p()).exp_m1()
        * (w[14] * (1.0 - r)).exp();
    forgotten.min(stability * MAX_FORGET_RATIO)
}

// ============================================================================
// TESTS
// ============================================================================
