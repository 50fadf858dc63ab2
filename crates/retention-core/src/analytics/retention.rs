//! Review Log Aggregation
//!
//! Retention and accuracy metrics replayed from the review history. Every
//! function is pure over a snapshot and returns a neutral value (0) when
//! there is nothing to aggregate; the `checked_*` variants report that case
//! as `DegenerateAggregateInput` instead.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardState, ReviewLog};
use crate::error::{Result, RetentionError};

/// Review count and success rate for one hour of the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyBucket {
    /// Hour of day (0-23)
    pub hour: u32,
    pub count: u32,
    /// Share of reviews rated above Again, 0 for an empty bucket
    pub retention: f64,
}

/// Review count and success rate for reviews made from one state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRetention {
    pub state: CardState,
    pub count: u32,
    pub retention: f64,
}

/// Number of cards per lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCounts {
    pub new: u32,
    pub learning: u32,
    pub review: u32,
    pub relearning: u32,
}

impl StateCounts {
    pub fn total(&self) -> u32 {
        self.new + self.learning + self.review + self.relearning
    }

    pub fn get(&self, state: CardState) -> u32 {
        match state {
            CardState::New => self.new,
            CardState::Learning => self.learning,
            CardState::Review => self.review,
            CardState::Relearning => self.relearning,
        }
    }
}

fn success_ratio<'a>(logs: impl IntoIterator<Item = &'a ReviewLog>) -> Option<(u32, f64)> {
    let (total, passed) = logs.into_iter().fold((0u32, 0u32), |(total, passed), log| {
        (total + 1, passed + u32::from(log.is_success()))
    });
    (total > 0).then(|| (total, passed as f64 / total as f64))
}

// ============================================================================
// RETENTION
// ============================================================================

/// Share of mature reviews (card in Review state beforehand) that were
/// recalled. 0 when there are none.
pub fn true_retention(logs: &[ReviewLog]) -> f64 {
    checked_true_retention(logs).unwrap_or_else(|_| {
        tracing::debug!(logs = logs.len(), "No mature reviews, true retention defaults to 0");
        0.0
    })
}

/// Like [`true_retention`], failing when there are no mature reviews
pub fn checked_true_retention(logs: &[ReviewLog]) -> Result<f64> {
    success_ratio(logs.iter().filter(|log| log.state == CardState::Review))
        .map(|(_, ratio)| ratio)
        .ok_or(RetentionError::DegenerateAggregateInput("no review-state logs"))
}

/// Mean retrievability at `now` over cards reviewed at least once.
///
/// New cards are excluded rather than counted as zero. 0 when no card has
/// been reviewed.
pub fn average_retrievability(cards: &[Card], now: DateTime<Utc>) -> f64 {
    checked_average_retrievability(cards, now).unwrap_or_else(|_| {
        tracing::debug!(
            cards = cards.len(),
            "No reviewed cards, average retrievability defaults to 0"
        );
        0.0
    })
}

/// Like [`average_retrievability`], failing when no card has been reviewed
pub fn checked_average_retrievability(cards: &[Card], now: DateTime<Utc>) -> Result<f64> {
    let (count, sum) = cards
        .iter()
        .filter_map(|card| card.current_retrievability(now))
        .fold((0usize, 0.0f64), |(count, sum), r| (count + 1, sum + r));

    if count == 0 {
        return Err(RetentionError::DegenerateAggregateInput("no reviewed cards"));
    }
    Ok(sum / count as f64)
}

/// Success rate per pre-review state, in lifecycle order
pub fn retention_by_state(logs: &[ReviewLog]) -> Vec<StateRetention> {
    CardState::ALL
        .iter()
        .map(|state| {
            let (count, retention) =
                success_ratio(logs.iter().filter(|log| log.state == *state)).unwrap_or((0, 0.0));
            StateRetention {
                state: *state,
                count,
                retention,
            }
        })
        .collect()
}

// ============================================================================
// TIME BUCKETS
// ============================================================================

/// 24 hourly buckets by UTC hour of the review timestamp
pub fn hourly_breakdown(logs: &[ReviewLog]) -> Vec<HourlyBucket> {
    hourly_breakdown_in(logs, &utc_offset())
}

/// 24 hourly buckets by local hour at a fixed UTC offset
pub fn hourly_breakdown_in(logs: &[ReviewLog], offset: &FixedOffset) -> Vec<HourlyBucket> {
    let mut counts = [(0u32, 0u32); 24];
    for log in logs {
        let hour = log.review.with_timezone(offset).hour() as usize;
        counts[hour].0 += 1;
        counts[hour].1 += u32::from(log.is_success());
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, (count, passed))| HourlyBucket {
            hour: hour as u32,
            count: *count,
            retention: if *count > 0 {
                *passed as f64 / *count as f64
            } else {
                0.0
            },
        })
        .collect()
}

/// Reviews per local calendar day
pub fn daily_review_counts(logs: &[ReviewLog], offset: &FixedOffset) -> BTreeMap<NaiveDate, u32> {
    let mut days = BTreeMap::new();
    for log in logs {
        *days
            .entry(log.review.with_timezone(offset).date_naive())
            .or_insert(0) += 1;
    }
    days
}

// ============================================================================
// CARD COLLECTION METRICS
// ============================================================================

/// Count cards per state
pub fn state_counts(cards: &[Card]) -> StateCounts {
    let mut counts = StateCounts::default();
    for card in cards {
        match card.state {
            CardState::New => counts.new += 1,
            CardState::Learning => counts.learning += 1,
            CardState::Review => counts.review += 1,
            CardState::Relearning => counts.relearning += 1,
        }
    }
    counts
}

/// Mean answer time in milliseconds, 0 for no logs
pub fn average_duration_ms(logs: &[ReviewLog]) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }
    logs.iter().map(|log| log.duration as f64).sum::<f64>() / logs.len() as f64
}

/// Cards whose lapse count reached `threshold`
pub fn leeches(cards: &[Card], threshold: u32) -> Vec<&Card> {
    cards.iter().filter(|card| card.is_leech(threshold)).collect()
}

pub(crate) fn utc_offset() -> FixedOffset {
    Utc.fix()
}

// ============================================================================
// TESTS
// ============================================================================
