//! In-memory test deck
//!
//! Plays the part of the external storage collaborator:
//! - Holds the current card records and the append-only review log
//! - Serializes reviews of the same card by owning the only mutable copy
//! - Supports snapshot and restore for "what if" tests

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use retention_core::{
    Card, Rating, Result, ReviewEvent, ReviewLog, ReviewResult, Scheduler, SchedulerConfig,
};

/// Deck of cards plus their review history
///
/// # Example
///
/// ```rust,ignore
/// let mut deck = TestDeck::unfuzzed();
/// let id = deck.add_card(now);
/// deck.review(&id, Rating::Good, now)?;
/// assert_eq!(deck.logs().len(), 1);
/// ```
pub struct TestDeck {
    scheduler: Scheduler,
    cards: BTreeMap<String, Card>,
    logs: Vec<ReviewLog>,
    snapshot: Option<(BTreeMap<String, Card>, Vec<ReviewLog>)>,
}

impl Default for TestDeck {
    fn default() -> Self {
        Self::new(Scheduler::new())
    }
}

impl TestDeck {
    /// Create an empty deck around a scheduler
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            cards: BTreeMap::new(),
            logs: Vec::new(),
            snapshot: None,
        }
    }

    /// Deck whose scheduler never fuzzes, for exact interval assertions
    pub fn unfuzzed() -> Self {
        let config = SchedulerConfig {
            enable_fuzz: false,
            ..Default::default()
        };
        Self::new(Scheduler::with_config(config).expect("valid scheduler config"))
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Add a new card and return its id
    pub fn add_card(&mut self, now: DateTime<Utc>) -> String {
        let card = Card::new(now);
        let id = card.id.clone();
        self.cards.insert(id.clone(), card);
        id
    }

    /// Add a card with a fixed id
    pub fn add_card_with_id(&mut self, id: &str, now: DateTime<Utc>) -> String {
        self.cards.insert(id.to_string(), Card::with_id(id, now));
        id.to_string()
    }

    /// Insert an existing record as-is
    pub fn insert(&mut self, card: Card) {
        self.cards.insert(card.id.clone(), card);
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Snapshot of all cards
    pub fn cards(&self) -> Vec<Card> {
        self.cards.values().cloned().collect()
    }

    pub fn logs(&self) -> &[ReviewLog] {
        &self.logs
    }

    /// Review a card; on error the deck is left unchanged
    pub fn review(&mut self, id: &str, rating: Rating, now: DateTime<Utc>) -> Result<ReviewResult> {
        let event = ReviewEvent {
            card_id: id.to_string(),
            rating: rating.value(),
            timestamp: now,
            duration_ms: 3_000,
        };
        self.submit(&event)
    }

    /// Apply a raw event as a study session would submit it
    pub fn submit(&mut self, event: &ReviewEvent) -> Result<ReviewResult> {
        let card = self
            .cards
            .get(&event.card_id)
            .cloned()
            .unwrap_or_else(|| panic!("unknown card {}", event.card_id));
        let result = self.scheduler.apply_event(&card, event)?;
        self.cards.insert(card.id.clone(), result.card.clone());
        self.logs.push(result.log.clone());
        Ok(result)
    }

    /// Review a card each time it comes due, returning the final record
    pub fn review_on_schedule(&mut self, id: &str, ratings: &[Rating]) -> Result<Card> {
        for rating in ratings {
            let due = self.card(id).map(|c| c.due).expect("card exists");
            self.review(id, *rating, due)?;
        }
        Ok(self.card(id).cloned().expect("card exists"))
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    /// Remember the current state
    pub fn take_snapshot(&mut self) {
        self.snapshot = Some((self.cards.clone(), self.logs.clone()));
    }

    /// Return to the last snapshot, if any
    pub fn restore_snapshot(&mut self) -> bool {
        match self.snapshot.take() {
            Some((cards, logs)) => {
                self.cards = cards;
                self.logs = logs;
                true
            }
            None => false,
        }
    }
}
