use crate::application::ports::local_store::OutboxStore;
use crate::domain::entities::OutboxEntry;
use crate::domain::value_objects::{RecordType, SyncOutcome};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sync queue manager: owns enqueueing and outcome bookkeeping for outbox
/// entries. State transitions beyond creation happen only through
/// `mark_outcome`, driven by the orchestrator.
pub struct OutboxService {
    store: Arc<dyn OutboxStore>,
    max_attempts: u32,
}

impl OutboxService {
    pub fn new(store: Arc<dyn OutboxStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Enqueue a sync obligation for a freshly created record. Losing a sync
    /// opportunity is recoverable, losing user data is not, so a failure here
    /// is logged and swallowed rather than failing the record write.
    pub async fn enqueue(&self, record_type: RecordType, record_id: i64) -> Option<i64> {
        match self.store.enqueue(record_type, record_id).await {
            Ok(entry_id) => {
                debug!(%record_type, record_id, entry_id, "queued record for sync");
                Some(entry_id)
            }
            Err(e) => {
                warn!(%record_type, record_id, "failed to queue record for sync: {e}");
                None
            }
        }
    }

    pub async fn get_entry(&self, id: i64) -> Result<Option<OutboxEntry>, AppError> {
        self.store.get_entry(id).await
    }

    pub async fn list_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, AppError> {
        self.store.list_pending(limit).await
    }

    pub async fn mark_outcome(
        &self,
        id: i64,
        outcome: SyncOutcome,
        details: Option<Value>,
    ) -> Result<OutboxEntry, AppError> {
        self.store
            .mark_outcome(id, outcome, details, self.max_attempts)
            .await
    }

    pub async fn purge_completed(
        &self,
        older_than: Option<DateTime<Utc>>,
    ) -> Result<u64, AppError> {
        self.store.purge_completed(older_than).await
    }
}
