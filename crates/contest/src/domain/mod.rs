mod contests;
mod registry;

pub use contests::*;
pub use registry::*;

use crate::infra::entry_source::EntrySourceError;
use contest_core::{ChannelRef, ContestId, ContestState, CoreError};

/// Errors surfaced to the command layer driving the engine.
///
/// Background reconciliation never propagates these to a caller; the watcher
/// logs them and keeps ticking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("contest {0} not found")]
    NotFound(ContestId),

    /// The contest was already settled, typically by the reconciliation loop
    /// racing a manual end. Distinct from `InvalidState` so command layers
    /// can phrase it as a no-op rather than a mistake.
    #[error("contest {0} has already ended")]
    AlreadyEnded(ContestId),

    #[error("contest {0} is {1}")]
    InvalidState(ContestId, ContestState),

    /// The entry source could not produce an entrant set. For scheduled
    /// settlement the contest stays `Active` and is retried on the next tick.
    #[error("entry source unavailable for contest {0}: {1}")]
    SourceUnavailable(ContestId, #[source] EntrySourceError),

    #[error("channel {0} is not enabled for contests")]
    ChannelRestricted(ChannelRef),
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}
