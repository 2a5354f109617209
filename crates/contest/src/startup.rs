use crate::{
    config::Settings,
    domain::{ChannelRegistry, ContestStore, ContestWatcher, Coordinator},
    infra::{
        entry_source::EntrySource, entry_source_mock::InMemoryEntrySource,
        presenter::{LogPresenter, Presenter},
    },
};
use anyhow::anyhow;
use contest_core::ChannelRef;
use log::{error, info, warn};
use std::{sync::Arc, time::Duration};
use tokio::select;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

pub struct Application {
    coordinator: Arc<Coordinator>,
    cancellation_token: CancellationToken,
    background_tasks: TaskTracker,
}

impl Application {
    /// Build the engine with the in-memory adapters. Real deployments embed
    /// the library and pass their platform adapters to
    /// [`Application::build_with_adapters`].
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let entry_source = Arc::new(InMemoryEntrySource::new());
        info!("In-memory entry source configured");
        Self::build_with_adapters(config, entry_source, Arc::new(LogPresenter)).await
    }

    pub async fn build_with_adapters(
        config: Settings,
        entry_source: Arc<dyn EntrySource>,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self, anyhow::Error> {
        // The watcher must not run before the entry source is usable.
        entry_source
            .ping()
            .await
            .map_err(|e| anyhow!("entry source not ready: {}", e))?;

        let registry = Arc::new(ChannelRegistry::with_allowed(
            config
                .engine_settings
                .allowed_channels
                .iter()
                .map(|id| ChannelRef(*id)),
        ));

        let coordinator = Arc::new(Coordinator::new(
            Arc::new(ContestStore::new()),
            entry_source,
            presenter,
            registry,
            Duration::from_secs(config.engine_settings.fetch_timeout_secs),
        ));

        let cancellation_token = CancellationToken::new();
        let background_tasks = TaskTracker::new();

        let watcher = ContestWatcher::new(
            coordinator.clone(),
            cancellation_token.clone(),
            Duration::from_secs(config.engine_settings.sync_interval_secs),
        );
        background_tasks.spawn(async move {
            if let Err(e) = watcher.watch().await {
                error!("Contest watcher stopped with error: {}", e);
            }
        });
        background_tasks.close();

        Ok(Self {
            coordinator,
            cancellation_token,
            background_tasks,
        })
    }

    /// Handle for the command layer driving create/end/cancel/reroll/list.
    pub fn coordinator(&self) -> Arc<Coordinator> {
        self.coordinator.clone()
    }

    /// Run until SIGINT/SIGTERM, then stop the watcher and wait for it with
    /// a bounded grace period.
    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        info!("Engine running, waiting for shutdown signal");
        shutdown_signal().await;
        info!("Shutdown initiated");
        self.shutdown().await
    }

    /// Stop the reconciliation loop. Safe to invoke while a tick is in
    /// flight; the loop finishes the contest it is on and exits.
    pub async fn shutdown(self) -> Result<(), anyhow::Error> {
        self.cancellation_token.cancel();

        let timeout = tokio::time::sleep(Duration::from_secs(10));
        select! {
            _ = self.background_tasks.wait() => {
                info!("Background tasks completed gracefully");
            }
            _ = timeout => {
                warn!("Background tasks timed out during shutdown");
            }
        }

        info!("Shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
