//! Integration tests for the oven board.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;

use ovenboard::board::Board;
use ovenboard::error::Error;
use ovenboard::event::LogEvent;
use ovenboard::model::{BatchPolicy, OvenState, OvenStateDoc, OvenStatus};
use ovenboard::view::Controls;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 2, 9, 30, 0).unwrap()
}

fn chicken_board() -> Board {
    Board::new(4, BatchPolicy::Chickens)
}

// ---------------------------------------------------------------------------
// Initial state
// ---------------------------------------------------------------------------

#[test]
fn new_board_is_all_empty() {
    let board = chicken_board();

    assert_eq!(board.oven_count(), 4);
    for (oven, state) in board.slots() {
        assert!((1..=4).contains(&oven));
        assert_eq!(*state, OvenState::Empty);
    }
}

#[test]
fn unknown_oven_is_rejected() {
    let mut board = chicken_board();

    assert!(matches!(board.get(9), Err(Error::UnknownOven(9))));
    assert!(matches!(
        board.start_cooking(0, 10, t0()),
        Err(Error::UnknownOven(0))
    ));
}

// ---------------------------------------------------------------------------
// Start cooking
// ---------------------------------------------------------------------------

#[test]
fn start_cooking_sets_batch_and_timing() {
    let mut board = chicken_board();

    let transition = board.start_cooking(1, 28, t0()).unwrap();

    let state = board.get(1).unwrap();
    let batch = state.batch().expect("cooking slot has a batch");
    assert_eq!(state.status(), OvenStatus::Cooking);
    assert_eq!(batch.chickens, 28);
    assert_eq!(batch.start_time, t0());
    assert_eq!(batch.expected_end_time - batch.start_time, Duration::minutes(90));

    assert_eq!(
        transition.event,
        LogEvent::StartCooking {
            oven: 1,
            chickens: 28,
            start_time: t0(),
            expected_end_time: t0() + Duration::minutes(90),
        }
    );
}

#[test]
fn start_cooking_requires_an_empty_oven() {
    let mut board = chicken_board();
    board.start_cooking(1, 28, t0()).unwrap();

    let result = board.start_cooking(1, 10, t0() + Duration::minutes(5));
    assert!(matches!(
        result,
        Err(Error::InvalidTransition {
            oven: 1,
            from: OvenStatus::Cooking,
            to: OvenStatus::Cooking,
        })
    ));
}

// ---------------------------------------------------------------------------
// Adjust cooking time
// ---------------------------------------------------------------------------

#[test]
fn adjust_moves_expected_end_and_preserves_the_batch() {
    let mut board = chicken_board();
    board.start_cooking(2, 28, t0()).unwrap();

    let later = t0() + Duration::minutes(40);
    let transition = board.adjust_cooking_time(2, 45, later).unwrap();

    let batch = board.get(2).unwrap().batch().copied().unwrap();
    assert_eq!(batch.expected_end_time, later + Duration::minutes(45));
    assert_eq!(batch.start_time, t0());
    assert_eq!(batch.chickens, 28);

    assert_eq!(
        transition.event,
        LogEvent::AdjustCookingTime {
            oven: 2,
            new_time_left: 45,
            new_expected_end_time: later + Duration::minutes(45),
        }
    );
}

#[test]
fn adjust_rejects_non_positive_minutes_and_changes_nothing() {
    let mut board = chicken_board();
    board.start_cooking(2, 28, t0()).unwrap();
    let before = board.get(2).unwrap().clone();

    for minutes in [0, -15] {
        let result = board.adjust_cooking_time(2, minutes, t0() + Duration::minutes(10));
        assert!(matches!(result, Err(Error::NonPositiveMinutes(m)) if m == minutes));
        assert_eq!(*board.get(2).unwrap(), before);
    }
}

#[test]
fn adjust_requires_a_cooking_oven() {
    let mut board = chicken_board();

    let result = board.adjust_cooking_time(3, 30, t0());
    assert!(matches!(
        result,
        Err(Error::InvalidTransition {
            oven: 3,
            from: OvenStatus::Empty,
            to: OvenStatus::Cooking,
        })
    ));
}

// ---------------------------------------------------------------------------
// Finish cooking
// ---------------------------------------------------------------------------

#[test]
fn finish_records_the_actual_end_and_preserves_the_batch() {
    let mut board = chicken_board();
    board.start_cooking(1, 28, t0()).unwrap();

    let t1 = t0() + Duration::minutes(85);
    let transition = board.finish_cooking(1, t1).unwrap();

    match board.get(1).unwrap() {
        OvenState::Ready {
            batch,
            actual_end_time,
        } => {
            assert_eq!(batch.chickens, 28);
            assert_eq!(batch.start_time, t0());
            assert_eq!(*actual_end_time, Some(t1));
        }
        state => panic!("expected Ready, got {:?}", state),
    }

    assert_eq!(
        transition.event,
        LogEvent::FinishCooking {
            oven: 1,
            chickens: 28,
            start_time: t0(),
            expected_end_time: t0() + Duration::minutes(90),
            actual_end_time: t1,
        }
    );
}

#[test]
fn finish_cannot_be_repeated_once_ready() {
    let mut board = chicken_board();
    board.start_cooking(1, 28, t0()).unwrap();
    board.finish_cooking(1, t0() + Duration::minutes(90)).unwrap();

    let result = board.finish_cooking(1, t0() + Duration::minutes(95));
    assert!(matches!(
        result,
        Err(Error::InvalidTransition {
            oven: 1,
            from: OvenStatus::Ready,
            to: OvenStatus::Ready,
        })
    ));
}

// ---------------------------------------------------------------------------
// Post-rush
// ---------------------------------------------------------------------------

#[test]
fn post_rush_counts_taken_and_clears_the_slot() {
    let mut board = chicken_board();
    board.start_cooking(4, 28, t0()).unwrap();
    board.finish_cooking(4, t0() + Duration::minutes(90)).unwrap();

    let t2 = t0() + Duration::minutes(150);
    let transition = board.log_post_rush(4, 5, t2).unwrap();

    assert_eq!(*board.get(4).unwrap(), OvenState::Empty);
    assert_eq!(
        transition.event,
        LogEvent::PostRush {
            oven: 4,
            chickens_taken: 23,
            chickens_left: 5,
            time: t2,
        }
    );
    // The cleared slot mirrors as the bare {} doc.
    assert_eq!(transition.doc, OvenStateDoc::default());
}

#[test]
fn post_rush_rejects_a_left_count_exceeding_the_batch() {
    let mut board = chicken_board();
    board.start_cooking(4, 28, t0()).unwrap();
    board.finish_cooking(4, t0() + Duration::minutes(90)).unwrap();

    let result = board.log_post_rush(4, 29, t0() + Duration::minutes(120));
    assert!(matches!(
        result,
        Err(Error::LeftoversExceedBatch {
            oven: 4,
            cooked: 28,
            left: 29,
        })
    ));
    // The slot stays Ready so the count can be re-entered.
    assert_eq!(board.get(4).unwrap().status(), OvenStatus::Ready);
}

#[test]
fn post_rush_requires_a_ready_oven() {
    let mut board = chicken_board();
    board.start_cooking(4, 28, t0()).unwrap();

    let result = board.log_post_rush(4, 3, t0() + Duration::minutes(30));
    assert!(matches!(
        result,
        Err(Error::InvalidTransition {
            oven: 4,
            from: OvenStatus::Cooking,
            to: OvenStatus::Empty,
        })
    ));
}

// ---------------------------------------------------------------------------
// Snapshot resynchronization
// ---------------------------------------------------------------------------

#[test]
fn snapshot_overwrites_optimistic_local_state() {
    let mut board = chicken_board();
    board.start_cooking(1, 28, t0()).unwrap();
    board.start_cooking(2, 10, t0()).unwrap();

    // The store only knows about oven 2, and with a different count.
    let remote = OvenState::Cooking(ovenboard::model::Batch {
        chickens: 12,
        start_time: t0() + Duration::minutes(1),
        expected_end_time: t0() + Duration::minutes(91),
    });
    let mut snapshot = BTreeMap::new();
    snapshot.insert(2, remote.to_doc());

    board.apply_snapshot(&snapshot);

    // Last fetch wins: oven 1's local state is gone, oven 2 took the
    // store's version.
    assert_eq!(*board.get(1).unwrap(), OvenState::Empty);
    assert_eq!(*board.get(2).unwrap(), remote);
}

#[test]
fn snapshot_with_no_entry_resets_the_slot_to_empty() {
    let mut board = chicken_board();
    board.start_cooking(3, 28, t0()).unwrap();

    board.apply_snapshot(&BTreeMap::new());

    assert_eq!(*board.get(3).unwrap(), OvenState::Empty);
}

#[test]
fn snapshot_keeps_the_slot_on_a_malformed_entry() {
    let mut board = chicken_board();
    board.start_cooking(3, 28, t0()).unwrap();
    let before = board.get(3).unwrap().clone();

    // Claims Cooking but carries no batch fields.
    let mut snapshot = BTreeMap::new();
    snapshot.insert(
        3,
        OvenStateDoc {
            status: Some(OvenStatus::Cooking),
            ..OvenStateDoc::default()
        },
    );
    board.apply_snapshot(&snapshot);

    assert_eq!(*board.get(3).unwrap(), before);
}

#[test]
fn snapshot_ignores_ovens_not_on_the_board() {
    let mut board = chicken_board();

    let mut snapshot = BTreeMap::new();
    snapshot.insert(
        9,
        OvenState::Cooking(ovenboard::model::Batch {
            chickens: 5,
            start_time: t0(),
            expected_end_time: t0() + Duration::minutes(90),
        })
        .to_doc(),
    );
    board.apply_snapshot(&snapshot);

    assert!(board.get(9).is_err());
    for (_, state) in board.slots() {
        assert_eq!(*state, OvenState::Empty);
    }
}

// ---------------------------------------------------------------------------
// Full lifecycle, skewer deployment
// ---------------------------------------------------------------------------

#[test]
fn skewer_lifecycle_start_finish_post_rush() {
    let mut board = Board::new(
        4,
        BatchPolicy::Skewers {
            chickens_per_skewer: 4,
        },
    );
    assert_eq!(
        board.policy(),
        BatchPolicy::Skewers {
            chickens_per_skewer: 4
        }
    );

    // Start oven 2 with 7 skewers.
    board.start_cooking(2, 7, t0()).unwrap();
    let batch = board.get(2).unwrap().batch().copied().unwrap();
    assert_eq!(batch.chickens, 28);
    assert_eq!(batch.expected_end_time, t0() + Duration::minutes(90));
    assert!(Controls::for_status(board.get(2).unwrap().status()).finish);

    // Finish.
    let t1 = t0() + Duration::minutes(92);
    board.finish_cooking(2, t1).unwrap();
    let controls = Controls::for_status(board.get(2).unwrap().status());
    assert!(!controls.finish);
    assert!(controls.post_rush);

    // Post-rush with 3 left.
    board.log_post_rush(2, 3, t1 + Duration::minutes(60)).unwrap();
    assert_eq!(*board.get(2).unwrap(), OvenState::Empty);

    let latest = board.activity().entries().next().unwrap();
    assert!(latest.message.contains("25 chickens taken, 3 left"));
}

// ---------------------------------------------------------------------------
// Activity feed
// ---------------------------------------------------------------------------

#[test]
fn activity_feed_is_newest_first() {
    let mut board = chicken_board();
    board.start_cooking(1, 28, t0()).unwrap();
    board.finish_cooking(1, t0() + Duration::minutes(90)).unwrap();

    let messages: Vec<_> = board
        .activity()
        .entries()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Finished cooking"));
    assert!(messages[1].starts_with("Started cooking"));
}

#[test]
fn activity_feed_drops_the_oldest_past_capacity() {
    use ovenboard::event::{ActivityFeed, FEED_CAPACITY};

    let mut feed = ActivityFeed::new();
    for i in 0..FEED_CAPACITY + 10 {
        feed.push(t0(), format!("entry {i}"));
    }

    assert_eq!(feed.len(), FEED_CAPACITY);
    assert_eq!(feed.entries().next().unwrap().message, "entry 109");
}
