use super::{draw_winners, Contest, ContestStore, CreateContest, SettlementResult};
use crate::{
    domain::{ChannelRegistry, Error},
    infra::{
        entry_source::{EntrySource, EntrySourceError},
        presenter::Presenter,
    },
};
use contest_core::{
    parse_duration, validate_winner_count, ActorId, ChannelRef, ContestId, ContestState,
};
use log::{debug, error, info, warn};
use std::{collections::HashSet, sync::Arc, time::Duration};
use time::OffsetDateTime;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

/// Periodic reconciliation loop that settles contests whose entry window has
/// elapsed. Runs until cancelled; a failing tick is logged and never stops
/// the loop.
pub struct ContestWatcher {
    coordinator: Arc<Coordinator>,
    sync_interval: Duration,
    cancel_token: CancellationToken,
}

impl ContestWatcher {
    pub fn new(
        coordinator: Arc<Coordinator>,
        cancel_token: CancellationToken,
        sync_interval: Duration,
    ) -> Self {
        Self {
            coordinator,
            sync_interval,
            cancel_token,
        }
    }

    pub async fn watch(&self) -> Result<(), anyhow::Error> {
        info!("Starting contest watcher");

        loop {
            if self.cancel_token.is_cancelled() {
                info!("Contest watcher received cancellation");
                break;
            }

            match self
                .coordinator
                .settle_due(OffsetDateTime::now_utc())
                .await
            {
                Ok(_) => {
                    debug!("Contest reconciliation tick completed");
                }
                Err(e) => {
                    error!("Contest reconciliation error: {}", e);
                }
            }

            tokio::select! {
                _ = sleep(self.sync_interval) => continue,
                _ = self.cancel_token.cancelled() => {
                    info!("Contest watcher cancelled during sleep");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Operation surface of the engine: creates, ends, cancels and rerolls
/// contests, and drives scheduled settlement for the watcher.
pub struct Coordinator {
    pub contest_store: Arc<ContestStore>,
    entry_source: Arc<dyn EntrySource>,
    presenter: Arc<dyn Presenter>,
    registry: Arc<ChannelRegistry>,
    fetch_timeout: Duration,
}

impl Coordinator {
    pub fn new(
        contest_store: Arc<ContestStore>,
        entry_source: Arc<dyn EntrySource>,
        presenter: Arc<dyn Presenter>,
        registry: Arc<ChannelRegistry>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            contest_store,
            entry_source,
            presenter,
            registry,
            fetch_timeout,
        }
    }

    /// Open a contest from raw command input. Duration strings look like
    /// `30s`, `5m`, `2h`, `1d`; the winner count must land in 1..=20.
    pub async fn create_contest(
        &self,
        id: ContestId,
        channel: ChannelRef,
        host: ActorId,
        duration_str: &str,
        winner_count_str: &str,
        prize: &str,
    ) -> Result<Contest, Error> {
        if !self.registry.is_allowed(channel).await {
            return Err(Error::ChannelRestricted(channel));
        }

        let duration_secs = parse_duration(duration_str)?;
        let winner_count = winner_count_str.trim().parse::<u32>().map_err(|_| {
            Error::InvalidArgument(format!(
                "winner count must be a number, got {winner_count_str:?}"
            ))
        })?;

        self.contest_store
            .create(CreateContest {
                id,
                channel,
                host,
                prize: prize.to_string(),
                winner_count,
                duration_secs,
            })
            .await
    }

    pub async fn get_contest(&self, id: ContestId) -> Result<Contest, Error> {
        self.contest_store.get(id).await
    }

    pub async fn list_active_contests(&self) -> Vec<Contest> {
        self.contest_store.list_active().await
    }

    /// End an active contest now instead of waiting for its window to elapse.
    pub async fn end_contest(&self, id: ContestId) -> Result<SettlementResult, Error> {
        self.settle_contest(id).await
    }

    /// Cancel an active contest. Cancellation is terminal: the contest never
    /// settles and later ticks skip it. Notification failures are logged; the
    /// cancellation stands.
    pub async fn cancel_contest(&self, id: ContestId) -> Result<(), Error> {
        let contest = self.contest_store.cancel(id).await?;
        info!("contest {} cancelled by request", id);

        if let Err(e) = self.presenter.notify_cancelled(&contest).await {
            warn!("cancellation notice for contest {} failed: {}", id, e);
        }
        Ok(())
    }

    /// Drop a contest from the store entirely. Reserved for the case where
    /// the backing message is confirmed gone and a reroll can never work.
    pub async fn delete_contest(&self, id: ContestId) -> Result<(), Error> {
        self.contest_store.remove(id).await
    }

    /// Re-draw winners for an ended contest against a freshly fetched entrant
    /// set. An override changes this draw only; the stored winner count is
    /// never mutated. Results go back to the caller, which presents them.
    pub async fn reroll_contest(
        &self,
        id: ContestId,
        winner_count_override: Option<&str>,
    ) -> Result<SettlementResult, Error> {
        let override_count = match winner_count_override {
            Some(raw) => {
                let parsed = raw.trim().parse::<u32>().map_err(|_| {
                    Error::InvalidArgument(format!("winner count must be a number, got {raw:?}"))
                })?;
                validate_winner_count(parsed)?;
                Some(parsed)
            }
            None => None,
        };

        let handle = self
            .contest_store
            .handle(id)
            .await
            .ok_or(Error::NotFound(id))?;

        let (channel, stored_count) = {
            let contest = handle.lock().await;
            if contest.state != ContestState::Ended {
                return Err(Error::InvalidState(id, contest.state));
            }
            (contest.channel, contest.winner_count)
        };

        let entrants = self.fetch_entrants(id, channel).await?;
        let winners = draw_winners(&entrants, override_count.unwrap_or(stored_count));
        let drawn_at = OffsetDateTime::now_utc();

        {
            let mut contest = handle.lock().await;
            if contest.state != ContestState::Ended {
                return Err(Error::InvalidState(id, contest.state));
            }
            contest.last_winners = winners.clone();
        }

        info!("contest {} rerolled, {} winners drawn", id, winners.len());
        Ok(SettlementResult {
            contest_id: id,
            winners,
            drawn_at,
        })
    }

    /// One reconciliation pass: settle every active contest due as of `now`,
    /// sequentially. A failure in one contest is logged and never blocks the
    /// rest; unavailable sources leave the contest active for the next tick.
    pub async fn settle_due(&self, now: OffsetDateTime) -> Result<(), anyhow::Error> {
        let due = self.contest_store.due_contests(now).await;
        debug!("checking {} due contests", due.len());

        for id in due {
            match self.settle_contest(id).await {
                Ok(result) => {
                    info!(
                        "contest {} settled with {} winners",
                        id,
                        result.winners.len()
                    );
                }
                Err(Error::AlreadyEnded(_)) => {
                    // a manual end won the race, nothing to do
                    debug!("contest {} settled elsewhere before this tick", id);
                }
                Err(e) => {
                    error!(
                        "settlement of contest {} failed, leaving active for retry: {}",
                        id, e
                    );
                }
            }
        }

        Ok(())
    }

    /// Settle one contest end-to-end: fetch entrants, draw winners, flip the
    /// state to `Ended`, notify. The state transition is atomic under the
    /// per-contest lock; the entrant fetch happens outside every lock.
    async fn settle_contest(&self, id: ContestId) -> Result<SettlementResult, Error> {
        let handle = self
            .contest_store
            .handle(id)
            .await
            .ok_or(Error::NotFound(id))?;

        let channel = {
            let contest = handle.lock().await;
            match contest.state {
                ContestState::Active => contest.channel,
                ContestState::Ended => return Err(Error::AlreadyEnded(id)),
                ContestState::Cancelled => return Err(Error::InvalidState(id, contest.state)),
            }
        };

        // A missing channel or message aborts here with the contest untouched;
        // a present message nobody reacted to comes back as an empty set and
        // settles with zero winners.
        let entrants = self.fetch_entrants(id, channel).await?;

        let (snapshot, result) = {
            let mut contest = handle.lock().await;
            match contest.state {
                ContestState::Active => {}
                ContestState::Ended => return Err(Error::AlreadyEnded(id)),
                ContestState::Cancelled => return Err(Error::InvalidState(id, contest.state)),
            }

            let winners = draw_winners(&entrants, contest.winner_count);
            let drawn_at = OffsetDateTime::now_utc();
            contest.state = ContestState::Ended;
            contest.last_winners = winners.clone();
            contest.settled_at = Some(drawn_at);

            (
                contest.clone(),
                SettlementResult {
                    contest_id: id,
                    winners,
                    drawn_at,
                },
            )
        };

        if let Err(e) = self.presenter.notify_settled(&snapshot, &result).await {
            warn!("settlement notice for contest {} failed: {}", id, e);
        }

        Ok(result)
    }

    async fn fetch_entrants(
        &self,
        id: ContestId,
        channel: ChannelRef,
    ) -> Result<HashSet<ActorId>, Error> {
        match timeout(
            self.fetch_timeout,
            self.entry_source.fetch_entrants(channel, id),
        )
        .await
        {
            Ok(Ok(entrants)) => Ok(entrants),
            Ok(Err(e)) => Err(Error::SourceUnavailable(id, e)),
            Err(_) => Err(Error::SourceUnavailable(
                id,
                EntrySourceError::Timeout(self.fetch_timeout),
            )),
        }
    }
}
