//! Shared types between the contest engine and its command layers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a contest. In chat-platform deployments this is the
/// platform-assigned id of the message entrants react to, so uniqueness is
/// guaranteed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContestId(pub u64);

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the location where entries accumulate (a channel id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef(pub u64);

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a contest.
///
/// Transitions are one-directional: `Active` moves to `Ended` (time elapsed
/// or explicit end) or `Cancelled` (explicit cancel). `Ended` and `Cancelled`
/// are terminal; a reroll re-samples winners of an `Ended` contest without
/// changing its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestState {
    Active,
    Ended,
    Cancelled,
}

impl fmt::Display for ContestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContestState::Active => write!(f, "active"),
            ContestState::Ended => write!(f, "ended"),
            ContestState::Cancelled => write!(f, "cancelled"),
        }
    }
}
