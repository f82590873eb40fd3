use crate::application::ports::local_store::RecordStore;
use crate::application::ports::remote_gateway::{PushOutcome, RemoteGateway};
use crate::application::services::connectivity_service::{
    ConnectivityMonitor, ConnectivitySubscription,
};
use crate::application::services::outbox_service::OutboxService;
use crate::domain::entities::{OutboxEntry, SyncReport};
use crate::domain::value_objects::{OutboxStatus, SyncOutcome};
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Observable orchestrator state, mirrored into the UI's sync indicator.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub last_report: Option<SyncReport>,
}

/// How one entry left a pass.
enum Progress {
    Completed,
    RetryLater,
    Abandoned,
}

/// Drives sync passes over the outbox. The only component that transitions
/// outbox entries beyond creation; passes are serialized by an in-flight
/// guard, and entries are processed sequentially in enqueue order.
pub struct SyncService {
    monitor: Arc<ConnectivityMonitor>,
    outbox: Arc<OutboxService>,
    records: Arc<dyn RecordStore>,
    gateway: Arc<dyn RemoteGateway>,
    config: SyncConfig,
    in_flight: Mutex<()>,
    status: RwLock<SyncStatus>,
}

impl SyncService {
    pub fn new(
        monitor: Arc<ConnectivityMonitor>,
        outbox: Arc<OutboxService>,
        records: Arc<dyn RecordStore>,
        gateway: Arc<dyn RemoteGateway>,
        config: SyncConfig,
    ) -> Self {
        Self {
            monitor,
            outbox,
            records,
            gateway,
            config,
            in_flight: Mutex::new(()),
            status: RwLock::new(SyncStatus::default()),
        }
    }

    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Run one sync pass if the server is reachable. Returns a zero-progress
    /// report when offline or when another pass is already in flight.
    pub async fn sync_if_possible(&self) -> SyncReport {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("sync pass already in flight; skipping trigger");
            return SyncReport::aborted();
        };

        self.status.write().await.is_syncing = true;
        let report = self.run_pass().await;

        let mut status = self.status.write().await;
        status.is_syncing = false;
        if report.success {
            status.last_sync = Some(Utc::now());
        }
        status.last_report = Some(report);

        report
    }

    async fn run_pass(&self) -> SyncReport {
        if !self.monitor.check_now().await {
            info!("no server connectivity, sync aborted");
            return SyncReport::aborted();
        }

        let pending = match self.outbox.list_pending(self.config.pass_limit).await {
            Ok(pending) => pending,
            Err(e) => {
                warn!("failed to load pending outbox entries: {e}");
                return SyncReport::aborted();
            }
        };

        if pending.is_empty() {
            debug!("nothing to sync");
            return SyncReport::completed(0, 0);
        }

        info!(entries = pending.len(), "starting sync pass");

        let mut synced = 0;
        let mut failed = 0;
        for entry in &pending {
            match self.process_entry(entry).await {
                Ok(Progress::Completed) => synced += 1,
                Ok(Progress::Abandoned) => failed += 1,
                Ok(Progress::RetryLater) => {}
                // A broken entry must not take the rest of the pass with it.
                Err(e) => warn!(entry_id = entry.id, "failed to process outbox entry: {e}"),
            }
        }

        let cutoff = Utc::now() - Duration::days(self.config.retention_days);
        if let Err(e) = self.outbox.purge_completed(Some(cutoff)).await {
            warn!("failed to purge completed outbox entries: {e}");
        }

        info!(synced, failed, "sync pass finished");
        SyncReport::completed(synced, failed)
    }

    async fn process_entry(&self, entry: &OutboxEntry) -> Result<Progress, AppError> {
        if entry.attempts >= self.outbox.max_attempts() {
            self.outbox
                .mark_outcome(
                    entry.id,
                    SyncOutcome::Unrecoverable,
                    Some(json!({ "reason": "exceeded maximum sync attempts" })),
                )
                .await?;
            return Ok(Progress::Abandoned);
        }

        let payload = match self
            .records
            .record_payload(entry.record_type, entry.record_id)
            .await?
        {
            Some(payload) => payload,
            None => {
                // The record was deleted locally; nothing left to deliver.
                self.outbox
                    .mark_outcome(
                        entry.id,
                        SyncOutcome::Unrecoverable,
                        Some(json!({ "reason": "record not found" })),
                    )
                    .await?;
                return Ok(Progress::Abandoned);
            }
        };

        match self.gateway.push(entry.record_type, &payload).await {
            Ok(PushOutcome::Accepted { remote_id }) => {
                self.outbox
                    .mark_outcome(
                        entry.id,
                        SyncOutcome::Completed,
                        Some(json!({ "remoteId": remote_id })),
                    )
                    .await?;
                if let Err(e) = self
                    .records
                    .mark_synced(entry.record_type, entry.record_id)
                    .await
                {
                    warn!(entry_id = entry.id, "failed to flag record as synced: {e}");
                }
                Ok(Progress::Completed)
            }
            Ok(PushOutcome::Rejected { status, detail }) => {
                let updated = self
                    .outbox
                    .mark_outcome(
                        entry.id,
                        SyncOutcome::Failed,
                        Some(json!({ "status": status, "detail": detail })),
                    )
                    .await?;
                Ok(Self::progress_after_failure(&updated))
            }
            Err(e) => {
                let updated = self
                    .outbox
                    .mark_outcome(
                        entry.id,
                        SyncOutcome::Failed,
                        Some(json!({ "error": e.to_string() })),
                    )
                    .await?;
                Ok(Self::progress_after_failure(&updated))
            }
        }
    }

    fn progress_after_failure(updated: &OutboxEntry) -> Progress {
        if updated.status == OutboxStatus::Failed {
            Progress::Abandoned
        } else {
            Progress::RetryLater
        }
    }

    /// Periodic trigger: an immediate pass, then one per configured interval.
    /// Each pass re-checks connectivity itself, so ticks while offline are
    /// no-ops.
    pub fn schedule(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let period = std::time::Duration::from_secs(service.config.interval_minutes * 60);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                service.sync_if_possible().await;
            }
        })
    }

    /// Event trigger: run a pass on every validated online transition.
    pub fn watch_connectivity(self: &Arc<Self>) -> ConnectivitySubscription {
        let service = Arc::clone(self);
        self.monitor.subscribe(
            move || {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service.sync_if_possible().await;
                });
            },
            || {
                debug!("connectivity lost; sync suspended until next online transition");
            },
        )
    }
}
