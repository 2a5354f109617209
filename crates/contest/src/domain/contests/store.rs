use super::{Contest, CreateContest};
use crate::domain::Error;
use contest_core::{validate_duration_secs, validate_winner_count, ContestId, ContestState};
use log::debug;
use std::{collections::HashMap, sync::Arc};
use time::{Duration, OffsetDateTime};
use tokio::sync::{Mutex, RwLock};

/// In-memory store owning every contest entity.
///
/// The outer `RwLock` guards the map structure only and is never held across
/// I/O; each contest sits behind its own `Mutex`, which is the exclusive
/// critical section for read-modify-write operations. State is process-memory
/// resident and lost on restart, matching the documented source behavior.
#[derive(Debug, Default)]
pub struct ContestStore {
    contests: RwLock<HashMap<ContestId, Arc<Mutex<Contest>>>>,
}

impl ContestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new contest in the `Active` state, ending `duration_secs` from
    /// now. Fails without touching the store when the winner count is outside
    /// 1..=20, the duration is not positive or too large to schedule, or the
    /// id is already present.
    pub async fn create(&self, request: CreateContest) -> Result<Contest, Error> {
        validate_winner_count(request.winner_count)?;
        validate_duration_secs(request.duration_secs)?;

        let now = OffsetDateTime::now_utc();
        // The parser accepts any u64; durations that would push end_at past
        // the representable date range are rejected here, not panicked on.
        let end_at = i64::try_from(request.duration_secs)
            .ok()
            .and_then(|secs| now.checked_add(Duration::seconds(secs)))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "duration of {} seconds puts the end time out of range",
                    request.duration_secs
                ))
            })?;

        let contest = Contest {
            id: request.id,
            channel: request.channel,
            host: request.host,
            prize: request.prize,
            winner_count: request.winner_count,
            created_at: now,
            end_at,
            state: ContestState::Active,
            last_winners: Vec::new(),
            settled_at: None,
            cancelled_at: None,
        };

        let mut contests = self.contests.write().await;
        if contests.contains_key(&contest.id) {
            return Err(Error::InvalidArgument(format!(
                "contest {} already exists",
                contest.id
            )));
        }
        contests.insert(contest.id, Arc::new(Mutex::new(contest.clone())));
        debug!("contest {} created, ends at {}", contest.id, contest.end_at);

        Ok(contest)
    }

    pub async fn get(&self, id: ContestId) -> Result<Contest, Error> {
        let handle = self.handle(id).await.ok_or(Error::NotFound(id))?;
        let contest = handle.lock().await;
        Ok(contest.clone())
    }

    /// Grab the per-contest lock handle. Mutation outside the store goes
    /// through the coordinator, which holds this lock for every
    /// read-modify-write on the contest.
    pub(crate) async fn handle(&self, id: ContestId) -> Option<Arc<Mutex<Contest>>> {
        self.contests.read().await.get(&id).cloned()
    }

    /// Snapshot of every contest still accepting entries.
    pub async fn list_active(&self) -> Vec<Contest> {
        let handles: Vec<Arc<Mutex<Contest>>> =
            self.contests.read().await.values().cloned().collect();

        let mut active = Vec::new();
        for handle in handles {
            let contest = handle.lock().await;
            if contest.is_active() {
                active.push(contest.clone());
            }
        }
        active
    }

    /// Ids of active contests whose entry window has elapsed.
    pub async fn due_contests(&self, now: OffsetDateTime) -> Vec<ContestId> {
        let handles: Vec<Arc<Mutex<Contest>>> =
            self.contests.read().await.values().cloned().collect();

        let mut due = Vec::new();
        for handle in handles {
            let contest = handle.lock().await;
            if contest.is_due(now) {
                due.push(contest.id);
            }
        }
        due
    }

    /// Transition an active contest to `Cancelled`. A cancelled contest never
    /// settles and is skipped by every later reconciliation tick.
    pub async fn cancel(&self, id: ContestId) -> Result<Contest, Error> {
        let handle = self.handle(id).await.ok_or(Error::NotFound(id))?;
        let mut contest = handle.lock().await;

        if contest.state != ContestState::Active {
            return Err(Error::InvalidState(id, contest.state));
        }

        contest.state = ContestState::Cancelled;
        contest.cancelled_at = Some(OffsetDateTime::now_utc());
        Ok(contest.clone())
    }

    /// Remove a contest entirely. Only used when the backing message is
    /// confirmed gone; everything else stays in the store for reroll/audit.
    pub async fn remove(&self, id: ContestId) -> Result<(), Error> {
        self.contests
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound(id))
    }

    pub async fn count(&self) -> usize {
        self.contests.read().await.len()
    }
}
