pub mod config;
pub mod domain;
pub mod infra;
pub mod startup;

pub use config::*;
pub use domain::{
    ChannelRegistry, Contest, ContestWatcher, Coordinator, CreateContest, Error as ContestError,
    SettlementResult,
};
pub use infra::entry_source::{EntrySource, EntrySourceError};
pub use infra::entry_source_mock::InMemoryEntrySource;
pub use infra::presenter::{LogPresenter, Presenter};
pub use startup::*;
