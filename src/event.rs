//! Logging emitted by the board on every state transition.
//!
//! Two redundant paths by design: `LogEvent` is the machine's voice,
//! shipped to the store's `/log` endpoint for durable recording, while
//! the `ActivityFeed` is the human's voice, an ephemeral newest-first
//! list that lives and dies with the dashboard session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many activity entries the feed keeps before dropping the oldest.
pub const FEED_CAPACITY: usize = 100;

/// A structured log event, serialized as `{"action": ..., "data": {...}}`.
///
/// Action names and payload fields are the store's contract; downstream
/// reporting is trained on these exact shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum LogEvent {
    StartCooking {
        oven: u32,
        chickens: u32,
        start_time: DateTime<Utc>,
        expected_end_time: DateTime<Utc>,
    },
    AdjustCookingTime {
        oven: u32,
        new_time_left: i64,
        new_expected_end_time: DateTime<Utc>,
    },
    FinishCooking {
        oven: u32,
        chickens: u32,
        start_time: DateTime<Utc>,
        expected_end_time: DateTime<Utc>,
        actual_end_time: DateTime<Utc>,
    },
    PostRush {
        oven: u32,
        chickens_taken: u32,
        chickens_left: u32,
        time: DateTime<Utc>,
    },
}

impl LogEvent {
    /// The wire action name, for diagnostics.
    pub fn action(&self) -> &'static str {
        match self {
            LogEvent::StartCooking { .. } => "start_cooking",
            LogEvent::AdjustCookingTime { .. } => "adjust_cooking_time",
            LogEvent::FinishCooking { .. } => "finish_cooking",
            LogEvent::PostRush { .. } => "post_rush",
        }
    }
}

// ---------------------------------------------------------------------------
// Activity feed
// ---------------------------------------------------------------------------

/// One human-readable line in the session's activity feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Bounded newest-first feed of activity entries. Not persisted anywhere.
#[derive(Debug, Default)]
pub struct ActivityFeed {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry, dropping the oldest past capacity.
    pub fn push(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        self.entries.push_front(ActivityEntry {
            at,
            message: message.into(),
        });
        self.entries.truncate(FEED_CAPACITY);
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
