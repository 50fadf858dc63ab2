//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Cards in every state of the review cycle
//! - Seeded synthetic decks for analytics tests
//! - Pre-built scenarios for common test cases

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use retention_core::{
    generate_history, Card, CardState, MemoryState, Rating, SyntheticConfig, SyntheticHistory,
};

use crate::harness::TestDeck;

/// Factory for creating test data
///
/// # Example
///
/// ```rust,ignore
/// let mut deck = TestDeck::unfuzzed();
/// let scenario = TestDataFactory::create_scheduling_scenario(&mut deck, now);
/// let review_id = &scenario.metadata["review"];
/// ```
pub struct TestDataFactory;

/// Pre-built test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    /// IDs of created cards
    pub card_ids: Vec<String>,
    /// Description of the scenario
    pub description: String,
    /// Metadata for test assertions (role name -> card id)
    pub metadata: HashMap<String, String>,
}

impl TestScenario {
    fn new(description: &str) -> Self {
        Self {
            card_ids: Vec::new(),
            description: description.to_string(),
            metadata: HashMap::new(),
        }
    }

    fn add(&mut self, role: &str, id: String) {
        self.metadata.insert(role.to_string(), id.clone());
        self.card_ids.push(id);
    }

    /// Card id registered under `role`
    pub fn id(&self, role: &str) -> &str {
        self.metadata
            .get(role)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("scenario has no {role} card"))
    }
}

impl TestDataFactory {
    /// Fixed reference time so that dates in assertions are stable
    pub fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-05T09:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    // ========================================================================
    // SINGLE CARDS
    // ========================================================================

    /// Card in Review state, last reviewed at `last_review`
    pub fn review_card(
        id: &str,
        stability: f64,
        difficulty: f64,
        last_review: DateTime<Utc>,
        lapses: u32,
    ) -> Card {
        let scheduled_days = stability.round().max(1.0) as u32;
        Card::from_parts(
            id,
            CardState::Review,
            Some(MemoryState {
                stability,
                difficulty,
            }),
            last_review + Duration::days(scheduled_days as i64),
            Some(last_review),
            0.0,
            scheduled_days,
            lapses + 3,
            lapses,
        )
        .expect("valid review card")
    }

    // ========================================================================
    // SCENARIOS
    // ========================================================================

    /// One card in each state: new, learning, review, relearning
    pub fn create_scheduling_scenario(deck: &mut TestDeck, now: DateTime<Utc>) -> TestScenario {
        let mut scenario = TestScenario::new("One card per scheduling state");

        scenario.add("new", deck.add_card_with_id("sched-new", now));

        let id = deck.add_card_with_id("sched-learning", now);
        deck.review(&id, Rating::Again, now).expect("learning review");
        scenario.add("learning", id);

        let id = deck.add_card_with_id("sched-review", now);
        deck.review(&id, Rating::Good, now).expect("review review");
        scenario.add("review", id);

        let id = deck.add_card_with_id("sched-relearning", now);
        deck.review(&id, Rating::Good, now).expect("first review");
        let due = deck.card(&id).map(|c| c.due).expect("card exists");
        deck.review(&id, Rating::Again, due).expect("lapse");
        scenario.add("relearning", id);

        scenario
    }

    /// A card one lapse short of the default leech threshold
    pub fn create_leech_scenario(deck: &mut TestDeck, now: DateTime<Utc>) -> TestScenario {
        let mut scenario = TestScenario::new("Card with 7 lapses about to become a leech");
        let card = Self::review_card("leech", 1.2, 9.1, now - Duration::days(2), 7);
        scenario.add("leech", card.id.clone());
        deck.insert(card);

        let steady = Self::review_card("steady", 40.0, 4.0, now - Duration::days(10), 0);
        scenario.add("steady", steady.id.clone());
        deck.insert(steady);

        scenario
    }

    /// Cards of varied stability all reviewed at the same moment
    pub fn create_decay_scenario(deck: &mut TestDeck, last_review: DateTime<Utc>) -> TestScenario {
        let mut scenario = TestScenario::new("Decay testing scenario with varied stability");
        for (role, stability) in [("low", 1.0), ("medium", 10.0), ("high", 100.0)] {
            let card = Self::review_card(
                &format!("decay-{role}"),
                stability,
                5.0,
                last_review,
                0,
            );
            scenario.add(role, card.id.clone());
            deck.insert(card);
        }
        scenario
    }

    /// Seeded synthetic deck of `card_count` cards studied for `days` days
    pub fn synthetic_history(seed: u64, card_count: usize, days: u32) -> SyntheticHistory {
        let config = SyntheticConfig {
            card_count,
            days,
            new_cards_per_day: 8,
            ..Default::default()
        };
        let deck = TestDeck::default();
        generate_history(
            &mut ChaCha8Rng::seed_from_u64(seed),
            &config,
            deck.scheduler(),
            Self::epoch(),
        )
        .expect("synthetic history")
    }
}
