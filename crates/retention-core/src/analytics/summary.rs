//! Dashboard summary
//!
//! One serializable record bundling the streak, retention metrics, card-state
//! counts and workload forecast for presentation layers.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::retention::{
    average_duration_ms, average_retrievability, daily_review_counts, hourly_breakdown_in,
    leeches, state_counts, true_retention, HourlyBucket, StateCounts,
};
use super::streak::{StreakCalculator, StreakConfig, StreakSummary};
use super::workload::{overdue_count, simulate_future_workload, WorkloadConfig, WorkloadDay};
use crate::card::{Card, ReviewLog};
use crate::error::{Result, RetentionError};
use crate::fsrs::DEFAULT_LEECH_THRESHOLD;

/// Summary configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryConfig {
    /// Days of workload forecast
    pub forecast_days: u32,
    pub leech_threshold: u32,
    /// Learner's UTC offset, used for day and hour bucketing
    pub utc_offset_seconds: i32,
    pub workload: WorkloadConfig,
    pub streak: StreakConfig,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            forecast_days: 30,
            leech_threshold: DEFAULT_LEECH_THRESHOLD,
            utc_offset_seconds: 0,
            workload: WorkloadConfig::default(),
            streak: StreakConfig::default(),
        }
    }
}

impl SummaryConfig {
    /// The configured offset, rejecting values outside +/-24h
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            RetentionError::InvalidConfig(format!(
                "utc offset {}s out of range",
                self.utc_offset_seconds
            ))
        })
    }
}

/// Aggregates consumed by dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub generated_at: DateTime<Utc>,
    pub total_cards: u32,
    pub state_counts: StateCounts,
    pub total_reviews: u32,
    pub true_retention: f64,
    pub average_retrievability: f64,
    pub average_duration_ms: f64,
    pub leech_count: u32,
    /// Reviewed cards due today or earlier
    pub overdue: u32,
    pub streak: StreakSummary,
    pub hourly: Vec<HourlyBucket>,
    pub workload: Vec<WorkloadDay>,
}

impl AnalyticsSummary {
    /// Build the summary from a consistent snapshot of cards and logs
    pub fn build(
        cards: &[Card],
        logs: &[ReviewLog],
        now: DateTime<Utc>,
        config: &SummaryConfig,
    ) -> Result<Self> {
        let offset = config.offset()?;
        let today = now.with_timezone(&offset).date_naive();
        let streaks = StreakCalculator::with_config(config.streak.clone())?;

        let daily = daily_review_counts(logs, &offset);
        let summary = Self {
            generated_at: now,
            total_cards: cards.len() as u32,
            state_counts: state_counts(cards),
            total_reviews: logs.len() as u32,
            true_retention: true_retention(logs),
            average_retrievability: average_retrievability(cards, now),
            average_duration_ms: average_duration_ms(logs),
            leech_count: leeches(cards, config.leech_threshold).len() as u32,
            overdue: overdue_count(cards, today),
            streak: streaks.compute(&daily, today),
            hourly: hourly_breakdown_in(logs, &offset),
            workload: simulate_future_workload(cards, config.forecast_days, today, &config.workload),
        };

        tracing::debug!(
            cards = summary.total_cards,
            reviews = summary.total_reviews,
            true_retention = summary.true_retention,
            streak = summary.streak.current,
            "Analytics summary built"
        );

        Ok(summary)
    }
}
