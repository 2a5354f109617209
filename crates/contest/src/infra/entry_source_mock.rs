use super::entry_source::{EntrySource, EntrySourceError};
use async_trait::async_trait;
use contest_core::{ActorId, ChannelRef, ContestId};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory entry source for local runs and embedders' tests.
///
/// Entrants are seeded per contest marker. Channels or markers can be marked
/// unavailable to exercise the abort-and-retry settlement path.
#[derive(Debug, Default)]
pub struct InMemoryEntrySource {
    entrants: RwLock<HashMap<ContestId, HashSet<ActorId>>>,
    down_channels: RwLock<HashSet<ChannelRef>>,
    down_markers: RwLock<HashSet<ContestId>>,
}

impl InMemoryEntrySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_entrant(&self, marker: ContestId, actor: ActorId) {
        self.entrants
            .write()
            .await
            .entry(marker)
            .or_default()
            .insert(actor);
    }

    pub async fn set_entrants(&self, marker: ContestId, actors: HashSet<ActorId>) {
        self.entrants.write().await.insert(marker, actors);
    }

    /// Simulate a deleted channel: every fetch against it fails.
    pub async fn set_channel_down(&self, channel: ChannelRef, down: bool) {
        let mut channels = self.down_channels.write().await;
        if down {
            channels.insert(channel);
        } else {
            channels.remove(&channel);
        }
    }

    /// Simulate a deleted marker message.
    pub async fn set_marker_down(&self, marker: ContestId, down: bool) {
        let mut markers = self.down_markers.write().await;
        if down {
            markers.insert(marker);
        } else {
            markers.remove(&marker);
        }
    }
}

#[async_trait]
impl EntrySource for InMemoryEntrySource {
    async fn ping(&self) -> Result<(), EntrySourceError> {
        Ok(())
    }

    async fn fetch_entrants(
        &self,
        channel: ChannelRef,
        marker: ContestId,
    ) -> Result<HashSet<ActorId>, EntrySourceError> {
        if self.down_channels.read().await.contains(&channel) {
            return Err(EntrySourceError::Unavailable(format!(
                "channel {channel} not found"
            )));
        }
        if self.down_markers.read().await.contains(&marker) {
            return Err(EntrySourceError::Unavailable(format!(
                "marker message {marker} not found"
            )));
        }

        // No record means the marker exists but nobody reacted yet.
        Ok(self
            .entrants
            .read()
            .await
            .get(&marker)
            .cloned()
            .unwrap_or_default())
    }
}
