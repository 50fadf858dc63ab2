//! Streaks and Activity Heatmap
//!
//! Daily review counts are turned into:
//! - a current and longest streak, where a limited number of "freeze" tokens
//!   bridge missed days
//! - heatmap levels 0-4 scaled against a high percentile of active days, so a
//!   single marathon session does not flatten every other day to level 1

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetentionError};

/// Streak and heatmap configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakConfig {
    /// A day counts as active when its reviews exceed this
    pub activity_threshold: u32,
    /// Consecutive missed days tolerated before the streak resets
    pub freeze_tokens: u32,
    /// Percentile of active-day counts mapped to the top heatmap level
    pub heatmap_percentile: f64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            activity_threshold: 0,
            freeze_tokens: 1,
            heatmap_percentile: 0.9,
        }
    }
}

impl StreakConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.heatmap_percentile > 0.0 && self.heatmap_percentile <= 1.0) {
            return Err(RetentionError::InvalidConfig(format!(
                "heatmap percentile {} must be in (0, 1]",
                self.heatmap_percentile
            )));
        }
        Ok(())
    }
}

/// Streak state as of a given day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Active days in the ongoing streak
    pub current: u32,
    /// Longest streak ever reached
    pub longest: u32,
    /// Most recent active day
    pub last_active: Option<NaiveDate>,
    /// Freeze tokens spent inside the ongoing streak
    pub freezes_used: u32,
}

/// One day of the activity heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    /// 0 = no reviews, 4 = at or above the percentile threshold
    pub level: u8,
}

/// Streak and heatmap calculator
#[derive(Debug, Clone, Default)]
pub struct StreakCalculator {
    config: StreakConfig,
}

impl StreakCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: StreakConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StreakConfig {
        &self.config
    }

    fn is_active(&self, count: u32) -> bool {
        count > self.config.activity_threshold
    }

    /// Walk every day from the first active one through `today`.
    ///
    /// A missed day spends a freeze token; tokens refill on each active day.
    /// With no token left the current streak drops to 0. `today` itself never
    /// breaks the streak since the day is not over yet. Days after `today`
    /// are ignored.
    pub fn compute(&self, daily_counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> StreakSummary {
        let Some(first) = daily_counts
            .iter()
            .find(|(date, count)| **date <= today && self.is_active(**count))
            .map(|(date, _)| *date)
        else {
            return StreakSummary::default();
        };

        let mut summary = StreakSummary::default();
        let mut freezes_left = self.config.freeze_tokens;

        for date in first.iter_days().take_while(|date| *date <= today) {
            let count = daily_counts.get(&date).copied().unwrap_or(0);
            if self.is_active(count) {
                summary.current += 1;
                summary.longest = summary.longest.max(summary.current);
                summary.last_active = Some(date);
                freezes_left = self.config.freeze_tokens;
            } else if date == today {
                // still in progress
            } else if summary.current > 0 && freezes_left > 0 {
                freezes_left -= 1;
                summary.freezes_used += 1;
            } else {
                summary.current = 0;
                summary.freezes_used = 0;
            }
        }

        summary
    }

    /// Heatmap cells for every day in `[from, to]`; empty when `from > to`
    pub fn heatmap(
        &self,
        daily_counts: &BTreeMap<NaiveDate, u32>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<HeatmapCell> {
        if from > to {
            tracing::debug!(%from, %to, "Reversed heatmap window, no cells");
            return Vec::new();
        }
        let mut active: Vec<u32> = daily_counts
            .range(from..=to)
            .map(|(_, count)| *count)
            .filter(|count| *count > 0)
            .collect();
        active.sort_unstable();
        let top = percentile(&active, self.config.heatmap_percentile);

        from.iter_days()
            .take_while(|date| *date <= to)
            .map(|date| {
                let count = daily_counts.get(&date).copied().unwrap_or(0);
                HeatmapCell {
                    date,
                    count,
                    level: level_for(count, top),
                }
            })
            .collect()
    }

    /// Heatmap for the `days` days ending at `today`
    pub fn heatmap_for_last(
        &self,
        daily_counts: &BTreeMap<NaiveDate, u32>,
        today: NaiveDate,
        days: u32,
    ) -> Vec<HeatmapCell> {
        let from = today
            .checked_sub_days(Days::new(days.saturating_sub(1) as u64))
            .unwrap_or(today);
        self.heatmap(daily_counts, from, today)
    }
}

/// Nearest-rank percentile of sorted values, 0 for none
fn percentile(sorted: &[u32], p: f64) -> u32 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn level_for(count: u32, top: u32) -> u8 {
    if count == 0 || top == 0 {
        return 0;
    }
    let ratio = count as f64 / top as f64;
    if ratio > 0.75 {
        4
    } else if ratio > 0.5 {
        3
    } else if ratio > 0.25 {
        2
    } else {
        1
    }
}
