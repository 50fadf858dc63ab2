//! Synthetic Review History
//!
//! Generates cards and review logs for demos, dashboard seeding and
//! benchmarks by replaying a simulated learner through the real scheduler.
//! All randomness comes from the caller's RNG handle, so a seeded RNG gives
//! the same history every time.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::{Card, ReviewEvent, ReviewLog};
use crate::error::{Result, RetentionError};
use crate::fsrs::{Rating, Scheduler};

/// First-review rating weights (Again, Hard, Good, Easy)
const FIRST_RATING_WEIGHTS: [f64; 4] = [0.10, 0.20, 0.55, 0.15];

/// Rating weights once recall succeeded (Hard, Good, Easy)
const RECALL_RATING_WEIGHTS: [f64; 3] = [0.15, 0.70, 0.15];

/// Simulated learner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyntheticConfig {
    /// Cards in the deck
    pub card_count: usize,
    /// Days of study to simulate
    pub days: u32,
    /// New cards introduced per study day
    pub new_cards_per_day: u32,
    /// Chance of skipping a day entirely
    pub skip_probability: f64,
    /// Latest session start, in minutes after the day's base time
    pub session_jitter_minutes: i64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            card_count: 100,
            days: 60,
            new_cards_per_day: 10,
            skip_probability: 0.1,
            session_jitter_minutes: 180,
            min_duration_ms: 1_500,
            max_duration_ms: 12_000,
        }
    }
}

impl SyntheticConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.skip_probability) {
            return Err(RetentionError::InvalidConfig(format!(
                "skip probability {} must be in [0, 1]",
                self.skip_probability
            )));
        }
        if self.min_duration_ms > self.max_duration_ms {
            return Err(RetentionError::InvalidConfig(
                "min duration exceeds max duration".to_string(),
            ));
        }
        if self.session_jitter_minutes < 0 {
            return Err(RetentionError::InvalidConfig(
                "session jitter must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generated deck state and the logs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticHistory {
    pub cards: Vec<Card>,
    pub logs: Vec<ReviewLog>,
}

/// Simulate `config.days` days of study starting at `start`.
///
/// Each study day reviews every due card (recall sampled from its current
/// retrievability) and then introduces new cards up to the daily cap.
pub fn generate_history<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SyntheticConfig,
    scheduler: &Scheduler,
    start: DateTime<Utc>,
) -> Result<SyntheticHistory> {
    config.validate()?;

    let mut waiting: Vec<Card> = (0..config.card_count)
        .map(|_| {
            let id = uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid();
            Card::with_id(id.to_string(), start)
        })
        .collect();
    waiting.reverse();

    let mut studied: Vec<Card> = Vec::new();
    let mut logs = Vec::new();

    for day in 0..config.days {
        if rng.gen_bool(config.skip_probability) {
            continue;
        }
        let jitter = rng.gen_range(0..=config.session_jitter_minutes);
        let mut clock = start + Duration::days(day as i64) + Duration::minutes(jitter);

        for card in studied.iter_mut() {
            if !card.is_due(clock) {
                continue;
            }
            let rating = sample_recall(rng, card.retrievability(clock)?);
            let duration_ms = rng.gen_range(config.min_duration_ms..=config.max_duration_ms);
            let event = ReviewEvent {
                card_id: card.id.clone(),
                rating: rating.value(),
                timestamp: clock,
                duration_ms,
            };
            let result = scheduler.apply_event(card, &event)?;
            *card = result.card;
            logs.push(result.log);
            clock += Duration::milliseconds(duration_ms as i64);
        }

        for _ in 0..config.new_cards_per_day {
            let Some(card) = waiting.pop() else { break };
            let rating = sample_weighted(rng, &Rating::ALL, &FIRST_RATING_WEIGHTS);
            let duration_ms = rng.gen_range(config.min_duration_ms..=config.max_duration_ms);
            let event = ReviewEvent {
                card_id: card.id.clone(),
                rating: rating.value(),
                timestamp: clock,
                duration_ms,
            };
            let result = scheduler.apply_event(&card, &event)?;
            studied.push(result.card);
            logs.push(result.log);
            clock += Duration::milliseconds(duration_ms as i64);
        }
    }

    waiting.reverse();
    studied.extend(waiting);

    tracing::info!(
        cards = studied.len(),
        logs = logs.len(),
        days = config.days,
        "Synthetic history generated"
    );

    Ok(SyntheticHistory {
        cards: studied,
        logs,
    })
}

fn sample_recall<R: Rng + ?Sized>(rng: &mut R, retrievability: f64) -> Rating {
    if !rng.gen_bool(retrievability.clamp(0.0, 1.0)) {
        return Rating::Again;
    }
    sample_weighted(
        rng,
        &[Rating::Hard, Rating::Good, Rating::Easy],
        &RECALL_RATING_WEIGHTS,
    )
}

fn sample_weighted<R: Rng + ?Sized>(rng: &mut R, ratings: &[Rating], weights: &[f64]) -> Rating {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.gen_range(0.0..total);
    for (rating, weight) in ratings.iter().zip(weights) {
        if roll < *weight {
            return *rating;
        }
        roll -= weight;
    }
    ratings[ratings.len() - 1]
}
