use crate::application::services::{
    ConnectivityMonitor, ConnectivitySubscription, OutboxService, RecordService, SyncService,
};
use crate::infrastructure::connectivity::{HttpLivenessProbe, SharedLinkState};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::gateway::HttpRemoteGateway;
use crate::infrastructure::store::SqliteLocalStore;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Fully wired application state. The host hands platform link-state events
/// to `link`, reads and writes records through `records`, and lets the
/// background triggers drive the sync loop.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub link: Arc<SharedLinkState>,
    pub monitor: Arc<ConnectivityMonitor>,
    pub records: Arc<RecordService>,
    pub outbox: Arc<OutboxService>,
    pub sync: Arc<SyncService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(AppError::Configuration)?;

        let pool = ConnectionPool::new(&config.database).await?;
        let store = Arc::new(SqliteLocalStore::new(pool.get_pool().clone()));

        let outbox = Arc::new(OutboxService::new(store.clone(), config.sync.max_attempts));
        let records = Arc::new(RecordService::new(
            store.clone(),
            store.clone(),
            outbox.clone(),
        ));

        // Assume the link is up until the host reports otherwise; the probe
        // corrects an optimistic guess on the first check.
        let link = Arc::new(SharedLinkState::new(true));
        let probe = Arc::new(HttpLivenessProbe::new(
            &config.network.base_url,
            Duration::from_secs(config.network.probe_timeout_secs),
        )?);
        let monitor = Arc::new(ConnectivityMonitor::new(link.clone(), probe));

        let gateway = Arc::new(HttpRemoteGateway::new(
            &config.network.base_url,
            Duration::from_secs(config.network.push_timeout_secs),
        )?);

        let sync = Arc::new(SyncService::new(
            monitor.clone(),
            outbox.clone(),
            store,
            gateway,
            config.sync.clone(),
        ));

        info!(
            database = %config.database.url,
            server = %config.network.base_url,
            "application state initialized"
        );

        Ok(Self {
            config,
            pool,
            link,
            monitor,
            records,
            outbox,
            sync,
        })
    }

    /// Start both sync triggers: the periodic pass and the pass on every
    /// validated online transition. The returned handles stop the triggers
    /// when dropped (subscription) or aborted (scheduler).
    pub fn start_sync_triggers(&self) -> (JoinHandle<()>, ConnectivitySubscription) {
        (self.sync.schedule(), self.sync.watch_connectivity())
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
    }
}
