//! Core data model.
//!
//! An oven is a fixed slot on the kitchen board. It cycles through a
//! three-state lifecycle (Empty -> Cooking -> Ready -> Empty) and is
//! mirrored wholesale to the remote store on every transition.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed cook duration applied when a batch goes in.
pub const COOK_MINUTES: i64 = 90;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an oven slot.
///
/// Variant names serialize verbatim ("Empty", "Cooking", "Ready"); the
/// store and any other dashboard client key off these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OvenStatus {
    /// Nothing loaded. The slot's default.
    Empty,
    /// A batch is in, with a start time and an expected end time.
    Cooking,
    /// The batch came out and is waiting for the post-rush count.
    Ready,
}

impl OvenStatus {
    /// Can transition from self to `to`?
    pub fn can_transition_to(self, to: OvenStatus) -> bool {
        use OvenStatus::*;
        matches!(
            (self, to),
            (Empty, Cooking)
                | (Cooking, Cooking) // time adjustment
                | (Cooking, Ready)
                | (Ready, Empty) // post-rush reset
        )
    }
}

impl std::fmt::Display for OvenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OvenStatus::Empty => "Empty",
            OvenStatus::Cooking => "Cooking",
            OvenStatus::Ready => "Ready",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// What is currently in an oven: count and timing. Immutable once loaded,
/// except for the expected end time which the adjust operation may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// Chicken count, already converted from the batch-size input.
    pub chickens: u32,

    /// When the batch went in.
    pub start_time: DateTime<Utc>,

    /// When the batch is expected to come out. Initially start + 90 min.
    pub expected_end_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Oven state
// ---------------------------------------------------------------------------

/// State of one oven slot. Batch fields exist exactly when the slot is
/// not Empty; the type makes the half-populated states unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum OvenState {
    Empty,
    Cooking(Batch),
    Ready {
        batch: Batch,
        /// When the batch actually came out. Optional on read: clients
        /// that predate end-time tracking never write it.
        actual_end_time: Option<DateTime<Utc>>,
    },
}

impl OvenState {
    pub fn status(&self) -> OvenStatus {
        match self {
            OvenState::Empty => OvenStatus::Empty,
            OvenState::Cooking(_) => OvenStatus::Cooking,
            OvenState::Ready { .. } => OvenStatus::Ready,
        }
    }

    /// The batch in the slot, if any.
    pub fn batch(&self) -> Option<&Batch> {
        match self {
            OvenState::Empty => None,
            OvenState::Cooking(batch) => Some(batch),
            OvenState::Ready { batch, .. } => Some(batch),
        }
    }

    /// Wire form of this state. Empty becomes the bare `{}` the store
    /// treats as a cleared slot.
    pub fn to_doc(&self) -> OvenStateDoc {
        match self {
            OvenState::Empty => OvenStateDoc::default(),
            OvenState::Cooking(batch) => OvenStateDoc {
                status: Some(OvenStatus::Cooking),
                start_time: Some(batch.start_time),
                expected_end_time: Some(batch.expected_end_time),
                actual_end_time: None,
                chickens: Some(batch.chickens),
            },
            OvenState::Ready {
                batch,
                actual_end_time,
            } => OvenStateDoc {
                status: Some(OvenStatus::Ready),
                start_time: Some(batch.start_time),
                expected_end_time: Some(batch.expected_end_time),
                actual_end_time: *actual_end_time,
                chickens: Some(batch.chickens),
            },
        }
    }

    /// Parse a wire doc. A missing status (or an explicit "Empty") is a
    /// valid Empty slot; a status that claims a batch without the batch
    /// fields is malformed.
    pub fn from_doc(doc: &OvenStateDoc) -> Result<OvenState> {
        let status = match doc.status {
            None | Some(OvenStatus::Empty) => return Ok(OvenState::Empty),
            Some(status) => status,
        };

        let batch = match (doc.start_time, doc.expected_end_time, doc.chickens) {
            (Some(start_time), Some(expected_end_time), Some(chickens)) => Batch {
                chickens,
                start_time,
                expected_end_time,
            },
            _ => return Err(Error::MalformedState { status }),
        };

        Ok(match status {
            OvenStatus::Empty => unreachable!("handled above"),
            OvenStatus::Cooking => OvenState::Cooking(batch),
            OvenStatus::Ready => OvenState::Ready {
                batch,
                actual_end_time: doc.actual_end_time,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Batch policy
// ---------------------------------------------------------------------------

/// How a user-entered batch size converts into a chicken count.
///
/// One deployment counts chickens directly, another loads skewers and
/// multiplies; one policy covers both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// The batch-size input is the chicken count.
    #[default]
    Chickens,
    /// The batch-size input is a skewer count.
    Skewers { chickens_per_skewer: u32 },
}

impl BatchPolicy {
    pub fn chickens_for(self, batch_size: u32) -> u32 {
        match self {
            BatchPolicy::Chickens => batch_size,
            BatchPolicy::Skewers { chickens_per_skewer } => batch_size * chickens_per_skewer,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire doc
// ---------------------------------------------------------------------------

/// The store's JSON shape for one oven: camelCase, all fields optional.
/// An empty object is an empty slot, both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OvenStateDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OvenStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_end_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_end_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chickens: Option<u32>,
}

/// Expected end time for a batch loaded at `start`.
pub fn expected_end(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::minutes(COOK_MINUTES)
}
