use crate::domain::entities::{
    FinancialInfo, FinancialInfoDraft, Identification, IdentificationDraft, ListingDraft,
    MarketplaceListing, OutboxEntry,
};
use crate::domain::value_objects::{RecordPayload, RecordType, SyncOutcome};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Durable keyed storage for domain records. Implementations must never
/// silently drop a write; storage-layer unavailability surfaces as
/// `AppError::Storage`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_identification(&self, draft: IdentificationDraft) -> Result<i64, AppError>;
    async fn insert_listing(&self, draft: ListingDraft) -> Result<i64, AppError>;
    async fn put_financial_info(&self, draft: FinancialInfoDraft) -> Result<i64, AppError>;

    async fn get_identification(&self, id: i64) -> Result<Option<Identification>, AppError>;
    async fn list_identifications(&self) -> Result<Vec<Identification>, AppError>;
    async fn get_listing(&self, id: i64) -> Result<Option<MarketplaceListing>, AppError>;
    /// Listings, optionally narrowed by product type (secondary index).
    async fn list_listings(
        &self,
        product_type: Option<&str>,
    ) -> Result<Vec<MarketplaceListing>, AppError>;
    async fn get_financial_info(&self, id: i64) -> Result<Option<FinancialInfo>, AppError>;
    async fn list_financial_info(&self) -> Result<Vec<FinancialInfo>, AppError>;

    /// Full JSON payload of a syncable record, as pushed to the remote API.
    /// `None` when the record no longer exists locally.
    async fn record_payload(
        &self,
        record_type: RecordType,
        id: i64,
    ) -> Result<Option<RecordPayload>, AppError>;

    /// Flip the record's `synced` flag after a confirmed remote write.
    async fn mark_synced(&self, record_type: RecordType, id: i64) -> Result<(), AppError>;

    async fn delete_record(&self, record_type: RecordType, id: i64) -> Result<(), AppError>;
    async fn delete_financial_info(&self, id: i64) -> Result<(), AppError>;
}

/// Key-value user preference storage with replace semantics.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn set_preference(&self, key: &str, value: Value) -> Result<(), AppError>;
    async fn get_preference(&self, key: &str) -> Result<Option<Value>, AppError>;
    async fn remove_preference(&self, key: &str) -> Result<(), AppError>;
}

/// Persistence for the sync outbox. Only `mark_outcome` transitions entry
/// state; it owns the pending/completed/failed state machine.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    async fn enqueue(&self, record_type: RecordType, record_id: i64) -> Result<i64, AppError>;

    async fn get_entry(&self, id: i64) -> Result<Option<OutboxEntry>, AppError>;

    /// Pending entries, oldest `created_at` first, bounded by `limit`.
    async fn list_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, AppError>;

    /// Record one processing attempt. Always increments `attempts` and sets
    /// `last_attempt_at`; terminal entries are left untouched. Errors with
    /// `NotFound` when the entry no longer exists. Returns the updated entry.
    async fn mark_outcome(
        &self,
        id: i64,
        outcome: SyncOutcome,
        details: Option<Value>,
        max_attempts: u32,
    ) -> Result<OutboxEntry, AppError>;

    /// Delete completed entries whose `last_attempt_at` predates the cutoff,
    /// or all completed entries when no cutoff is given. Returns the count
    /// removed.
    async fn purge_completed(&self, older_than: Option<DateTime<Utc>>) -> Result<u64, AppError>;
}
