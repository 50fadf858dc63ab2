//! # Retention Core
//!
//! Spaced-repetition scheduling engine for flashcard study. Decides, for every
//! card, when it will next be shown and how likely the learner still
//! remembers it, and derives retention and workload analytics from the
//! review history.
//!
//! - **Forgetting curve**: FSRS v4 power law, R = (1 + t / 9S)^-1
//! - **Card state machine**: New / Learning / Review / Relearning transitions
//!   driven by Again / Hard / Good / Easy ratings
//! - **Interval scheduling**: inverse curve at a target retention, clamped and
//!   fuzzed deterministically per card
//! - **Analytics**: true retention, average retrievability, hourly
//!   breakdown, workload forecast with backlog, streaks and heatmap
//!
//! The crate is a library boundary only. It consumes `ReviewEvent`s and
//! produces `Card`, `ReviewLog`, `ReviewOutcome` and `AnalyticsSummary`
//! records; persistence and presentation belong to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use retention_core::{Card, CardState, Rating, Scheduler};
//!
//! let scheduler = Scheduler::new();
//! let now = Utc::now();
//!
//! let card = Card::new(now);
//! let result = scheduler.apply_review(&card, Rating::Good, now)?;
//!
//! assert_eq!(result.card.state, CardState::Review);
//! assert_eq!(result.card.reps, 1);
//! # Ok::<(), retention_core::RetentionError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod analytics;
pub mod card;
pub mod error;
pub mod fsrs;

/// Seeded synthetic review histories for demos and benchmarks
pub mod synthetic;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use error::{Result, RetentionError};

// Card records
pub use card::{Card, CardState, MemoryState, ReviewEvent, ReviewLog, ReviewOutcome};

// FSRS algorithm and scheduler
pub use fsrs::{
    interval_for_retention,
    next_interval,
    // Core functions for advanced usage
    retrievability,
    PreviewResults,
    Rating,
    ReviewResult,
    Scheduler,
    SchedulerConfig,
};

// Analytics
pub use analytics::{
    accumulate_backlog, average_retrievability, hourly_breakdown, simulate_future_workload,
    true_retention, AnalyticsSummary, BacklogDay, HeatmapCell, HourlyBucket, StateCounts,
    StreakCalculator, StreakConfig, StreakSummary, SummaryConfig, WorkloadConfig, WorkloadDay,
};

pub use synthetic::{generate_history, SyntheticConfig, SyntheticHistory};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// FSRS parameterisation version (4 = 17 weights, power -1 curve)
pub const FSRS_VERSION: u8 = 4;

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        AnalyticsSummary, Card, CardState, Rating, Result, RetentionError, ReviewEvent, ReviewLog,
        ReviewResult, Scheduler, SchedulerConfig, StreakCalculator, SummaryConfig,
    };
}
