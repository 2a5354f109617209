mod coordinator;
mod settlement;
mod store;

pub use coordinator::*;
pub use settlement::*;
pub use store::*;

use contest_core::{ActorId, ChannelRef, ContestId, ContestState};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request to open a new contest. The id is assigned by the caller, in chat
/// deployments the platform message id of the contest announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContest {
    pub id: ContestId,
    /// Channel the entry reactions accumulate in
    pub channel: ChannelRef,
    /// Actor who opened the contest
    pub host: ActorId,
    pub prize: String,
    pub winner_count: u32,
    /// Entry window length in seconds
    pub duration_secs: u64,
}

/// A time-bound, reaction-based giveaway entity.
///
/// All fields except `state`, `last_winners` and the lifecycle timestamps are
/// immutable after creation. Ended contests are kept in the store so they can
/// be rerolled and audited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: ContestId,
    pub channel: ChannelRef,
    pub host: ActorId,
    pub prize: String,
    pub winner_count: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
    pub state: ContestState,
    /// Winners drawn at settlement, overwritten by each reroll
    pub last_winners: Vec<ActorId>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub settled_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
}

impl Contest {
    pub fn is_active(&self) -> bool {
        self.state == ContestState::Active
    }

    /// Whether the entry window has elapsed and the contest should settle.
    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        self.is_active() && self.end_at <= now
    }

    /// Seconds until the entry window closes, zero once due.
    pub fn seconds_remaining(&self, now: OffsetDateTime) -> u64 {
        let remaining = self.end_at - now;
        if remaining.is_negative() {
            0
        } else {
            remaining.whole_seconds() as u64
        }
    }
}

/// Outcome of settling or rerolling a contest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResult {
    pub contest_id: ContestId,
    /// Uniform sample of the entrant set; empty when nobody entered
    pub winners: Vec<ActorId>,
    #[serde(with = "time::serde::rfc3339")]
    pub drawn_at: OffsetDateTime,
}

impl SettlementResult {
    pub fn has_winners(&self) -> bool {
        !self.winners.is_empty()
    }
}
