//! Analytics Module
//!
//! Read-only aggregates over snapshots of cards and review logs:
//! - Retention metrics replayed from the review history
//! - Workload forecast with explicit backlog accumulation
//! - Streaks and activity heatmap
//! - Dashboard summary record

mod retention;
mod streak;
mod summary;
mod workload;

pub use retention::{
    average_duration_ms, average_retrievability, checked_average_retrievability,
    checked_true_retention, daily_review_counts, hourly_breakdown, hourly_breakdown_in, leeches,
    retention_by_state, state_counts, true_retention, HourlyBucket, StateCounts, StateRetention,
};
pub use streak::{HeatmapCell, StreakCalculator, StreakConfig, StreakSummary};
pub use summary::{AnalyticsSummary, SummaryConfig};
pub use workload::{
    accumulate_backlog, overdue_count, simulate_future_workload, BacklogDay, WorkloadConfig,
    WorkloadDay, DEFAULT_NEW_CARDS_PER_DAY,
};
