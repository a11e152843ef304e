//! The oven board. The public API for mutating slot state.
//!
//! The board owns one state per fixed oven slot plus the session's
//! activity feed. All mutation goes through the four transition
//! operations; rendering and store mirroring read from here.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{Error, Result};
use crate::event::{ActivityFeed, LogEvent};
use crate::model::{Batch, BatchPolicy, OvenState, OvenStateDoc, OvenStatus, expected_end};

/// What a successful transition hands back for mirroring: the wire doc to
/// upsert and the structured event to log. The two are independent
/// requests; there is no atomicity between them.
#[derive(Debug, Clone)]
pub struct Transition {
    pub oven: u32,
    pub doc: OvenStateDoc,
    pub event: LogEvent,
}

/// Registry of N fixed oven slots, numbered 1..=N.
pub struct Board {
    slots: BTreeMap<u32, OvenState>,
    policy: BatchPolicy,
    activity: ActivityFeed,
}

impl Board {
    pub fn new(oven_count: u32, policy: BatchPolicy) -> Self {
        Self {
            slots: (1..=oven_count).map(|n| (n, OvenState::Empty)).collect(),
            policy,
            activity: ActivityFeed::new(),
        }
    }

    pub fn oven_count(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Slots in oven-number order.
    pub fn slots(&self) -> impl Iterator<Item = (u32, &OvenState)> {
        self.slots.iter().map(|(n, s)| (*n, s))
    }

    pub fn get(&self, oven: u32) -> Result<&OvenState> {
        self.slot(oven)
    }

    pub fn activity(&self) -> &ActivityFeed {
        &self.activity
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Empty -> Cooking. Converts the batch-size input via the board's
    /// policy and stamps start and expected end times.
    ///
    /// Batch-size bounds are the input widget's job, not re-validated here.
    pub fn start_cooking(
        &mut self,
        oven: u32,
        batch_size: u32,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        match self.slot(oven)? {
            OvenState::Empty => {}
            state => {
                return Err(Error::InvalidTransition {
                    oven,
                    from: state.status(),
                    to: OvenStatus::Cooking,
                });
            }
        }

        let chickens = self.policy.chickens_for(batch_size);
        let batch = Batch {
            chickens,
            start_time: now,
            expected_end_time: expected_end(now),
        };
        let state = OvenState::Cooking(batch);
        let doc = state.to_doc();
        self.commit(oven, state)?;

        self.activity
            .push(now, format!("Started cooking {chickens} chickens in Oven {oven}"));

        Ok(Transition {
            oven,
            doc,
            event: LogEvent::StartCooking {
                oven,
                chickens,
                start_time: now,
                expected_end_time: batch.expected_end_time,
            },
        })
    }

    /// Cooking -> Cooking. Moves the expected end to `now + minutes`,
    /// preserving the start time and count.
    ///
    /// Rejects a non-positive minutes value; the slot is left untouched.
    pub fn adjust_cooking_time(
        &mut self,
        oven: u32,
        minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        if minutes <= 0 {
            return Err(Error::NonPositiveMinutes(minutes));
        }

        let batch = match self.slot(oven)? {
            OvenState::Cooking(batch) => *batch,
            state => {
                return Err(Error::InvalidTransition {
                    oven,
                    from: state.status(),
                    to: OvenStatus::Cooking,
                });
            }
        };

        let new_end = now + chrono::Duration::minutes(minutes);
        let state = OvenState::Cooking(Batch {
            expected_end_time: new_end,
            ..batch
        });
        let doc = state.to_doc();
        self.commit(oven, state)?;

        self.activity.push(
            now,
            format!("Adjusted cooking time for Oven {oven}, finishing in {minutes} minutes"),
        );

        Ok(Transition {
            oven,
            doc,
            event: LogEvent::AdjustCookingTime {
                oven,
                new_time_left: minutes,
                new_expected_end_time: new_end,
            },
        })
    }

    /// Cooking -> Ready. Preserves the batch and records when it actually
    /// came out.
    pub fn finish_cooking(&mut self, oven: u32, now: DateTime<Utc>) -> Result<Transition> {
        let batch = match self.slot(oven)? {
            OvenState::Cooking(batch) => *batch,
            state => {
                return Err(Error::InvalidTransition {
                    oven,
                    from: state.status(),
                    to: OvenStatus::Ready,
                });
            }
        };

        let state = OvenState::Ready {
            batch,
            actual_end_time: Some(now),
        };
        let doc = state.to_doc();
        self.commit(oven, state)?;

        self.activity
            .push(now, format!("Finished cooking in Oven {oven}"));

        Ok(Transition {
            oven,
            doc,
            event: LogEvent::FinishCooking {
                oven,
                chickens: batch.chickens,
                start_time: batch.start_time,
                expected_end_time: batch.expected_end_time,
                actual_end_time: now,
            },
        })
    }

    /// Ready -> Empty. Counts what the rush consumed and clears the slot.
    ///
    /// A left-count exceeding the batch is rejected and the slot stays
    /// Ready, so the count can be re-entered.
    pub fn log_post_rush(
        &mut self,
        oven: u32,
        chickens_left: u32,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let batch = match self.slot(oven)? {
            OvenState::Ready { batch, .. } => *batch,
            state => {
                return Err(Error::InvalidTransition {
                    oven,
                    from: state.status(),
                    to: OvenStatus::Empty,
                });
            }
        };

        let cooked = batch.chickens;
        if chickens_left > cooked {
            return Err(Error::LeftoversExceedBatch {
                oven,
                cooked,
                left: chickens_left,
            });
        }
        let chickens_taken = cooked - chickens_left;

        let state = OvenState::Empty;
        let doc = state.to_doc();
        self.commit(oven, state)?;

        self.activity.push(
            now,
            format!(
                "Post-rush: {chickens_taken} chickens taken, {chickens_left} left from Oven {oven}"
            ),
        );

        Ok(Transition {
            oven,
            doc,
            event: LogEvent::PostRush {
                oven,
                chickens_taken,
                chickens_left,
                time: now,
            },
        })
    }

    // -----------------------------------------------------------------------
    // Resynchronization
    // -----------------------------------------------------------------------

    /// Overwrite every slot from a fetched snapshot, last-fetch-wins.
    ///
    /// An absent key is a valid Empty slot. A malformed doc leaves that
    /// slot untouched and warns. Keys outside the board are ignored.
    pub fn apply_snapshot(&mut self, snapshot: &BTreeMap<u32, OvenStateDoc>) {
        for (oven, slot) in self.slots.iter_mut() {
            match snapshot.get(oven) {
                None => *slot = OvenState::Empty,
                Some(doc) => match OvenState::from_doc(doc) {
                    Ok(state) => *slot = state,
                    Err(e) => warn!(oven = *oven, "ignoring malformed remote state: {e}"),
                },
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn slot(&self, oven: u32) -> Result<&OvenState> {
        self.slots.get(&oven).ok_or(Error::UnknownOven(oven))
    }

    /// Replace a slot's state. Callers matched on the departing state
    /// already; the transition relation is enforced once more here, at
    /// the only write point.
    fn commit(&mut self, oven: u32, next: OvenState) -> Result<()> {
        let from = self.slot(oven)?.status();
        let to = next.status();
        if !from.can_transition_to(to) {
            return Err(Error::InvalidTransition { oven, from, to });
        }
        self.slots.insert(oven, next);
        Ok(())
    }
}
