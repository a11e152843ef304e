//! Display projections. Pure reads of board state; nothing here mutates.
//!
//! Timestamps are kept in UTC everywhere else and converted to local
//! wall-clock time only at this layer.

use chrono::{DateTime, Local, Utc};

use crate::board::Board;
use crate::event::ActivityFeed;
use crate::model::{OvenState, OvenStatus};

/// Which of the four operations a slot currently offers. Exactly the
/// enabled/disabled state of the per-oven controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub adjust: bool,
    pub finish: bool,
    pub post_rush: bool,
}

impl Controls {
    pub fn for_status(status: OvenStatus) -> Self {
        Self {
            start: status == OvenStatus::Empty,
            adjust: status == OvenStatus::Cooking,
            finish: status == OvenStatus::Cooking,
            post_rush: status == OvenStatus::Ready,
        }
    }
}

/// One oven's display surface: field texts with "-" placeholders, plus
/// control availability.
#[derive(Debug, Clone)]
pub struct SlotView {
    pub oven: u32,
    pub status: OvenStatus,
    pub start_time: String,
    pub expected_end_time: String,
    pub actual_end_time: String,
    pub chickens: String,
    pub controls: Controls,
}

pub fn slot_view(oven: u32, state: &OvenState) -> SlotView {
    let controls = Controls::for_status(state.status());
    let (start, expected, actual, chickens) = match state {
        OvenState::Empty => (None, None, None, 0),
        OvenState::Cooking(batch) => (
            Some(batch.start_time),
            Some(batch.expected_end_time),
            None,
            batch.chickens,
        ),
        OvenState::Ready {
            batch,
            actual_end_time,
        } => (
            Some(batch.start_time),
            Some(batch.expected_end_time),
            *actual_end_time,
            batch.chickens,
        ),
    };

    SlotView {
        oven,
        status: state.status(),
        start_time: time_text(start),
        expected_end_time: time_text(expected),
        actual_end_time: time_text(actual),
        chickens: chickens.to_string(),
        controls,
    }
}

/// The whole board as an aligned table.
pub fn render_board(board: &Board) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{:<6}{:<9}{:<10}{:<10}{:<10}{}",
        "OVEN", "STATUS", "START", "EXPECTED", "ACTUAL", "CHICKENS"
    ));
    lines.push("-".repeat(53));
    for (oven, state) in board.slots() {
        let v = slot_view(oven, state);
        lines.push(format!(
            "{:<6}{:<9}{:<10}{:<10}{:<10}{}",
            v.oven, v.status, v.start_time, v.expected_end_time, v.actual_end_time, v.chickens
        ));
    }
    lines.push(String::new());
    lines.push(format!("{} oven(s)", board.oven_count()));
    lines.join("\n")
}

/// One slot as a single line, for reporting a transition's outcome.
pub fn render_slot(view: &SlotView) -> String {
    match view.status {
        OvenStatus::Empty => format!("Oven {}: Empty", view.oven),
        _ => format!(
            "Oven {}: {}, {} chickens, started {}, expected end {}, actual end {}",
            view.oven,
            view.status,
            view.chickens,
            view.start_time,
            view.expected_end_time,
            view.actual_end_time
        ),
    }
}

/// The session's activity feed, newest first.
pub fn render_activity(feed: &ActivityFeed) -> String {
    feed.entries()
        .map(|e| format!("{}: {}", local_time(e.at), e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn time_text(t: Option<DateTime<Utc>>) -> String {
    t.map(local_time).unwrap_or_else(|| "-".to_string())
}

fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M:%S").to_string()
}
