//! FSRS (Free Spaced Repetition Scheduler) Module
//!
//! FSRS v4 parameterisation, whose forgetting curve is a simple power law.
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki
//!
//! ## Core Formulas:
//! - Retrievability: R = (1 + t / (9 * S))^(-1)
//! - Interval: t = 9 * S * (1/R - 1)

mod algorithm;
mod interval;
mod scheduler;

pub use algorithm::{
    elapsed_days_between,
    initial_difficulty,
    initial_difficulty_with_weights,
    initial_stability,
    initial_stability_with_weights,
    interval_for_retention,
    next_difficulty,
    next_difficulty_with_weights,
    next_forget_stability,
    next_forget_stability_with_weights,
    next_recall_stability,
    next_recall_stability_with_weights,
    // Core functions
    retrievability,
    Rating,
    // Constants
    CURVE_FACTOR,
    DEFAULT_RETENTION,
    FSRS4_WEIGHTS,
    MAX_DIFFICULTY,
    MAX_FORGET_RATIO,
    MAX_STABILITY,
    MIN_DIFFICULTY,
    MIN_STABILITY,
};

pub use interval::{
    fuzz_interval, fuzz_seed, next_interval, DEFAULT_MAXIMUM_INTERVAL, DEFAULT_MINIMUM_INTERVAL,
    FUZZ_MIN_INTERVAL,
};

pub use scheduler::{
    PreviewResults, ReviewResult, Scheduler, SchedulerConfig, DEFAULT_FUZZ_FACTOR,
    DEFAULT_LEECH_THRESHOLD, MAX_FUZZ_FACTOR,
};
