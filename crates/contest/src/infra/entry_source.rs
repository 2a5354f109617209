use async_trait::async_trait;
use contest_core::{ActorId, ChannelRef, ContestId};
use std::{collections::HashSet, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum EntrySourceError {
    /// The entry location or the marker message backing the contest could not
    /// be reached. Scheduled settlement aborts and retries on a later tick.
    #[error("entry source unavailable: {0}")]
    Unavailable(String),

    #[error("entrant fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Where entrants come from, backed by the chat platform's reaction-list API
/// in real deployments.
///
/// Contract: a missing channel or marker message is `Unavailable` — the
/// caller must not settle. A marker message that exists but carries no entry
/// reaction is an empty `Ok` set and settles with zero winners. Adapters are
/// responsible for excluding bot-flagged actors from the returned set.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Readiness probe, checked before the reconciliation loop starts.
    async fn ping(&self) -> Result<(), EntrySourceError>;

    /// Fetch the current entrant set for the contest marked by `marker`
    /// in `channel`.
    async fn fetch_entrants(
        &self,
        channel: ChannelRef,
        marker: ContestId,
    ) -> Result<HashSet<ActorId>, EntrySourceError>;
}
