use contest_core::ChannelRef;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Per-feature channel restriction registry.
///
/// Replaces the ad hoc "stash restriction attributes on the shared bot
/// object" pattern: each feature owns its registry and gets it injected at
/// construction. An empty allow-set means unrestricted; once any channel is
/// allowed, contests may only be created there.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    allowed: RwLock<HashSet<ChannelRef>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowed(channels: impl IntoIterator<Item = ChannelRef>) -> Self {
        Self {
            allowed: RwLock::new(channels.into_iter().collect()),
        }
    }

    pub async fn allow(&self, channel: ChannelRef) {
        self.allowed.write().await.insert(channel);
    }

    pub async fn revoke(&self, channel: ChannelRef) {
        self.allowed.write().await.remove(&channel);
    }

    pub async fn is_allowed(&self, channel: ChannelRef) -> bool {
        let allowed = self.allowed.read().await;
        allowed.is_empty() || allowed.contains(&channel)
    }

    pub async fn snapshot(&self) -> Vec<ChannelRef> {
        self.allowed.read().await.iter().copied().collect()
    }
}
