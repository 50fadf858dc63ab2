//! # Review Lifecycle Journey Tests
//!
//! A card's path through New, Learning, Review and Relearning as a
//! study session would drive it through the scheduler, including
//! rejected events and leech detection.

use chrono::Duration;
use retention_core::{CardState, Rating, RetentionError, ReviewEvent};
use retention_e2e_tests::{TestDataFactory, TestDeck};

// ============================================================================
// FIRST REVIEW
// ============================================================================

#[test]
fn test_new_card_rated_good_enters_review() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);

    let result = deck.review(&id, Rating::Good, now).unwrap();

    assert_eq!(result.card.state, CardState::Review);
    assert_eq!(result.card.reps, 1);
    assert_eq!(result.card.lapses, 0);
    assert!(result.card.stability().unwrap() > 0.0);
    assert!(result.card.due > now);
    assert!(result.outcome.is_new_card);
    assert_eq!(result.log.state, CardState::New);
}

#[test]
fn test_new_card_rated_again_enters_learning_without_lapse() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);

    let result = deck.review(&id, Rating::Again, now).unwrap();

    assert_eq!(result.card.state, CardState::Learning);
    assert_eq!(result.card.lapses, 0);
    assert_eq!(result.interval, 1);
}

#[test]
fn test_learning_card_graduates_on_success() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);
    deck.review(&id, Rating::Hard, now).unwrap();
    assert_eq!(deck.card(&id).unwrap().state, CardState::Learning);

    let card = deck.review_on_schedule(&id, &[Rating::Good]).unwrap();
    assert_eq!(card.state, CardState::Review);
    assert_eq!(card.reps, 2);
}

// ============================================================================
// LAPSES
// ============================================================================

#[test]
fn test_lapse_moves_review_card_to_relearning() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);
    let before = deck
        .review_on_schedule(&id, &[Rating::Good, Rating::Good, Rating::Good])
        .unwrap();
    assert_eq!(before.state, CardState::Review);

    let after = deck.review_on_schedule(&id, &[Rating::Again]).unwrap();

    assert_eq!(after.state, CardState::Relearning);
    assert_eq!(after.lapses, before.lapses + 1);
    assert!(after.stability().unwrap() < before.stability().unwrap());

    let recovered = deck.review_on_schedule(&id, &[Rating::Good]).unwrap();
    assert_eq!(recovered.state, CardState::Review);
    assert_eq!(recovered.lapses, after.lapses);
}

#[test]
fn test_eighth_lapse_flags_leech() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let scenario = TestDataFactory::create_leech_scenario(&mut deck, now);

    let leech = deck.review(scenario.id("leech"), Rating::Again, now).unwrap();
    assert_eq!(leech.card.lapses, 8);
    assert!(leech.became_leech);

    let steady = deck.review(scenario.id("steady"), Rating::Again, now).unwrap();
    assert_eq!(steady.card.lapses, 1);
    assert!(!steady.became_leech);

    // Already a leech: further lapses do not fire again
    let again = deck
        .review(scenario.id("leech"), Rating::Again, now + Duration::days(1))
        .unwrap();
    assert_eq!(again.card.lapses, 9);
    assert!(!again.became_leech);
}

// ============================================================================
// INTERVAL ORDERING
// ============================================================================

#[test]
fn test_preview_orders_intervals_by_rating() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::default();
    let scenario = TestDataFactory::create_scheduling_scenario(&mut deck, now);

    for role in ["new", "learning", "review", "relearning"] {
        let card = deck.card(scenario.id(role)).unwrap().clone();
        let at = card.due.max(now);
        let preview = deck.scheduler().preview(&card, at).unwrap();

        assert!(
            preview.hard.interval <= preview.good.interval,
            "{role}: hard {} > good {}",
            preview.hard.interval,
            preview.good.interval
        );
        assert!(
            preview.good.interval <= preview.easy.interval,
            "{role}: good {} > easy {}",
            preview.good.interval,
            preview.easy.interval
        );
        assert_eq!(preview.again.card.state, if card.is_new() {
            CardState::Learning
        } else {
            CardState::Relearning
        });
    }
}

#[test]
fn test_preview_does_not_commit() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);
    let card = deck.card(&id).unwrap().clone();

    deck.scheduler().preview(&card, now).unwrap();

    assert_eq!(deck.card(&id).unwrap(), &card);
    assert!(deck.logs().is_empty());
}

// ============================================================================
// REJECTED EVENTS
// ============================================================================

#[test]
fn test_rejected_events_leave_deck_unchanged() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);
    deck.review(&id, Rating::Good, now).unwrap();
    let card = deck.card(&id).unwrap().clone();

    let bad_rating = ReviewEvent {
        card_id: id.clone(),
        rating: 5,
        timestamp: now + Duration::days(1),
        duration_ms: 1_000,
    };
    assert_eq!(deck.submit(&bad_rating), Err(RetentionError::InvalidRating(5)));

    let zero_rating = ReviewEvent {
        rating: 0,
        ..bad_rating.clone()
    };
    assert_eq!(deck.submit(&zero_rating), Err(RetentionError::InvalidRating(0)));

    let earlier = deck.review(&id, Rating::Good, now - Duration::hours(1));
    assert!(matches!(
        earlier,
        Err(RetentionError::NonMonotonicReviewTime { .. })
    ));

    assert_eq!(deck.card(&id).unwrap(), &card);
    assert_eq!(deck.logs().len(), 1);
}

#[test]
fn test_event_json_from_session() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card_with_id("json-card", now);

    let json = format!(
        r#"{{"cardId":"{id}","rating":3,"timestamp":"2026-01-05T09:00:00Z","durationMs":4200}}"#
    );
    let event: ReviewEvent = serde_json::from_str(&json).unwrap();
    let result = deck.submit(&event).unwrap();

    assert_eq!(result.outcome.duration_ms, 4_200);
    assert_eq!(result.log.duration, 4_200);
    assert_eq!(result.log.review, now);
}

// ============================================================================
// SNAPSHOTS
// ============================================================================

#[test]
fn test_snapshot_compares_alternative_ratings() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);
    deck.review(&id, Rating::Good, now).unwrap();
    let due = deck.card(&id).unwrap().due;

    deck.take_snapshot();
    let easy = deck.review(&id, Rating::Easy, due).unwrap();
    assert!(deck.restore_snapshot());
    let hard = deck.review(&id, Rating::Hard, due).unwrap();

    assert!(easy.interval >= hard.interval);
    assert_eq!(deck.logs().len(), 2);
    assert!(!deck.restore_snapshot());
}

#[test]
fn test_long_success_run_grows_intervals() {
    let now = TestDataFactory::epoch();
    let mut deck = TestDeck::unfuzzed();
    let id = deck.add_card(now);
    deck.review(&id, Rating::Good, now).unwrap();

    let mut last = deck.card(&id).unwrap().scheduled_days;
    for _ in 0..8 {
        let card = deck.review_on_schedule(&id, &[Rating::Good]).unwrap();
        assert!(card.scheduled_days >= last);
        last = card.scheduled_days;
    }
    assert!(last > 30);

    let card = deck.card(&id).unwrap();
    assert_eq!(card.reps, 9);
    assert_eq!(card.lapses, 0);
    assert_eq!(deck.logs().len(), 9);
}
