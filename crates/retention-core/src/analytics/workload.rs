//! Workload Forecast
//!
//! Projects how many cards come due on each upcoming day. The forecast is a
//! pure function of the cards' current due dates, so it can be recomputed at
//! any time. Backlog is a separate pass over a forecast: whatever a day's
//! capacity leaves unreviewed carries into the next day.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Default number of new cards introduced per day
pub const DEFAULT_NEW_CARDS_PER_DAY: u32 = 20;

/// Forecast configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkloadConfig {
    /// Daily cap on new cards
    pub new_cards_per_day: u32,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            new_cards_per_day: DEFAULT_NEW_CARDS_PER_DAY,
        }
    }
}

/// Expected workload for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadDay {
    pub date: NaiveDate,
    /// New cards introduced that day
    pub new_cards: u32,
    /// Reviewed cards falling due that day
    pub reviews: u32,
    pub total: u32,
}

/// One day of a backlog projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogDay {
    pub date: NaiveDate,
    /// Cards scheduled for the day itself
    pub due: u32,
    /// Unreviewed cards inherited from earlier days
    pub carried_over: u32,
    /// Cards cleared within the day's capacity
    pub reviewed: u32,
    /// `due + carried_over`
    pub total: u32,
    /// Left for the next day
    pub remaining: u32,
}

/// Forecast one entry per day from tomorrow through `days` after `today`.
///
/// `reviews` counts already-reviewed cards whose due date (UTC) is that day.
/// `new_cards` is the daily cap, limited by the new cards still waiting.
/// Cards already overdue are not included; see [`overdue_count`].
pub fn simulate_future_workload(
    cards: &[Card],
    days: u32,
    today: NaiveDate,
    config: &WorkloadConfig,
) -> Vec<WorkloadDay> {
    let mut due_by_date: HashMap<NaiveDate, u32> = HashMap::new();
    let mut waiting_new = 0u32;
    for card in cards {
        if card.is_new() {
            waiting_new += 1;
        } else {
            *due_by_date.entry(card.due.date_naive()).or_insert(0) += 1;
        }
    }

    (1..=days)
        .filter_map(|offset| today.checked_add_days(Days::new(offset as u64)))
        .map(|date| {
            let new_cards = config.new_cards_per_day.min(waiting_new);
            waiting_new -= new_cards;
            let reviews = due_by_date.get(&date).copied().unwrap_or(0);
            WorkloadDay {
                date,
                new_cards,
                reviews,
                total: new_cards + reviews,
            }
        })
        .collect()
}

/// Already-reviewed cards due on or before `today`
pub fn overdue_count(cards: &[Card], today: NaiveDate) -> u32 {
    cards
        .iter()
        .filter(|card| !card.is_new() && card.due.date_naive() <= today)
        .count() as u32
}

/// Carry unreviewed work forward through a forecast.
///
/// Each day can clear at most `daily_capacity` cards; the rest is added to the
/// next day's total, so missed days compound. `initial_backlog` seeds the
/// first day (typically [`overdue_count`]).
pub fn accumulate_backlog(
    forecast: &[WorkloadDay],
    daily_capacity: u32,
    initial_backlog: u32,
) -> Vec<BacklogDay> {
    let mut carried = initial_backlog;
    forecast
        .iter()
        .map(|day| {
            let total = day.total + carried;
            let reviewed = total.min(daily_capacity);
            let remaining = total - reviewed;
            let entry = BacklogDay {
                date: day.date,
                due: day.total,
                carried_over: carried,
                reviewed,
                total,
                remaining,
            };
            carried = remaining;
            entry
        })
        .collect()
}
