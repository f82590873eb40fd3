use crate::application::ports::local_store::{OutboxStore, PreferenceStore, RecordStore};
use crate::domain::entities::{
    FinancialInfo, FinancialInfoDraft, Identification, IdentificationDraft, ListingDraft,
    MarketplaceListing, OutboxEntry,
};
use crate::domain::value_objects::{OutboxStatus, RecordPayload, RecordType, SyncOutcome};
use crate::infrastructure::store::mappers;
use crate::infrastructure::store::rows::{
    FinancialInfoRow, IdentificationRow, MarketplaceListingRow, OutboxEntryRow,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

/// sqlx-backed implementation of all local store ports over one sqlite pool.
pub struct SqliteLocalStore {
    pool: SqlitePool,
}

impl SqliteLocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_entry(&self, id: i64) -> Result<Option<OutboxEntry>, AppError> {
        let row = sqlx::query_as::<_, OutboxEntryRow>("SELECT * FROM sync_queue WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(mappers::outbox_entry_from_row).transpose()
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl RecordStore for SqliteLocalStore {
    async fn insert_identification(&self, draft: IdentificationDraft) -> Result<i64, AppError> {
        let result = serde_json::to_string(&draft.result)?;
        let inserted = sqlx::query(
            r#"
            INSERT INTO identifications (image_data, result, created_at, synced)
            VALUES (?1, ?2, ?3, 0)
            "#,
        )
        .bind(&draft.image_data)
        .bind(&result)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        Ok(inserted.last_insert_rowid())
    }

    async fn insert_listing(&self, draft: ListingDraft) -> Result<i64, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO marketplace (
                product_name, product_type, quantity, unit, price,
                description, contact_info, image_data, created_at, synced
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0)
            "#,
        )
        .bind(&draft.product_name)
        .bind(&draft.product_type)
        .bind(draft.quantity)
        .bind(&draft.unit)
        .bind(draft.price)
        .bind(&draft.description)
        .bind(&draft.contact_info)
        .bind(&draft.image_data)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        Ok(inserted.last_insert_rowid())
    }

    async fn put_financial_info(&self, draft: FinancialInfoDraft) -> Result<i64, AppError> {
        let info = serde_json::to_string(&draft.info)?;
        let inserted = sqlx::query("INSERT INTO finance (info, updated_at) VALUES (?1, ?2)")
            .bind(&info)
            .bind(now_millis())
            .execute(&self.pool)
            .await?;

        Ok(inserted.last_insert_rowid())
    }

    async fn get_identification(&self, id: i64) -> Result<Option<Identification>, AppError> {
        let row =
            sqlx::query_as::<_, IdentificationRow>("SELECT * FROM identifications WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(mappers::identification_from_row).transpose()
    }

    async fn list_identifications(&self) -> Result<Vec<Identification>, AppError> {
        let rows = sqlx::query_as::<_, IdentificationRow>(
            "SELECT * FROM identifications ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(mappers::identification_from_row)
            .collect()
    }

    async fn get_listing(&self, id: i64) -> Result<Option<MarketplaceListing>, AppError> {
        let row =
            sqlx::query_as::<_, MarketplaceListingRow>("SELECT * FROM marketplace WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(mappers::listing_from_row).transpose()
    }

    async fn list_listings(
        &self,
        product_type: Option<&str>,
    ) -> Result<Vec<MarketplaceListing>, AppError> {
        let rows = match product_type {
            Some(product_type) => {
                sqlx::query_as::<_, MarketplaceListingRow>(
                    r#"
                    SELECT * FROM marketplace
                    WHERE product_type = ?1
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .bind(product_type)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MarketplaceListingRow>(
                    "SELECT * FROM marketplace ORDER BY created_at ASC, id ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(mappers::listing_from_row).collect()
    }

    async fn get_financial_info(&self, id: i64) -> Result<Option<FinancialInfo>, AppError> {
        let row = sqlx::query_as::<_, FinancialInfoRow>("SELECT * FROM finance WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(mappers::financial_info_from_row).transpose()
    }

    async fn list_financial_info(&self) -> Result<Vec<FinancialInfo>, AppError> {
        let rows = sqlx::query_as::<_, FinancialInfoRow>(
            "SELECT * FROM finance ORDER BY updated_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(mappers::financial_info_from_row)
            .collect()
    }

    async fn record_payload(
        &self,
        record_type: RecordType,
        id: i64,
    ) -> Result<Option<RecordPayload>, AppError> {
        let value = match record_type {
            RecordType::Identification => self
                .get_identification(id)
                .await?
                .map(|record| serde_json::to_value(record))
                .transpose()?,
            RecordType::Marketplace => self
                .get_listing(id)
                .await?
                .map(|record| serde_json::to_value(record))
                .transpose()?,
        };

        value
            .map(|value| RecordPayload::new(value).map_err(AppError::Internal))
            .transpose()
    }

    async fn mark_synced(&self, record_type: RecordType, id: i64) -> Result<(), AppError> {
        let query = match record_type {
            RecordType::Identification => "UPDATE identifications SET synced = 1 WHERE id = ?1",
            RecordType::Marketplace => "UPDATE marketplace SET synced = 1 WHERE id = ?1",
        };
        let updated = sqlx::query(query).bind(id).execute(&self.pool).await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{record_type} record {id}")));
        }
        Ok(())
    }

    async fn delete_record(&self, record_type: RecordType, id: i64) -> Result<(), AppError> {
        let query = match record_type {
            RecordType::Identification => "DELETE FROM identifications WHERE id = ?1",
            RecordType::Marketplace => "DELETE FROM marketplace WHERE id = ?1",
        };
        sqlx::query(query).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn delete_financial_info(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM finance WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for SqliteLocalStore {
    async fn set_preference(&self, key: &str, value: Value) -> Result<(), AppError> {
        let value = serde_json::to_string(&value)?;
        sqlx::query(
            r#"
            INSERT INTO user_preferences (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(&value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_preference(&self, key: &str) -> Result<Option<Value>, AppError> {
        let raw: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        raw.map(|(value,)| serde_json::from_str(&value).map_err(AppError::from))
            .transpose()
    }

    async fn remove_preference(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_preferences WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OutboxStore for SqliteLocalStore {
    async fn enqueue(&self, record_type: RecordType, record_id: i64) -> Result<i64, AppError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO sync_queue (record_type, record_id, status, attempts, created_at)
            VALUES (?1, ?2, 'pending', 0, ?3)
            "#,
        )
        .bind(record_type.as_str())
        .bind(record_id)
        .bind(now_millis())
        .execute(&self.pool)
        .await?;

        Ok(inserted.last_insert_rowid())
    }

    async fn get_entry(&self, id: i64) -> Result<Option<OutboxEntry>, AppError> {
        self.fetch_entry(id).await
    }

    async fn list_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, AppError> {
        let rows = sqlx::query_as::<_, OutboxEntryRow>(
            r#"
            SELECT * FROM sync_queue
            WHERE status = 'pending'
            ORDER BY created_at ASC, id ASC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(mappers::outbox_entry_from_row)
            .collect()
    }

    async fn mark_outcome(
        &self,
        id: i64,
        outcome: SyncOutcome,
        details: Option<Value>,
        max_attempts: u32,
    ) -> Result<OutboxEntry, AppError> {
        let entry = self
            .fetch_entry(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("sync queue entry {id}")))?;

        if entry.is_terminal() {
            warn!(
                entry_id = entry.id,
                status = %entry.status,
                "ignoring outcome for terminal outbox entry"
            );
            return Ok(entry);
        }

        let attempts = entry.attempts + 1;
        let status = match outcome {
            SyncOutcome::Completed => OutboxStatus::Completed,
            SyncOutcome::Unrecoverable => OutboxStatus::Failed,
            SyncOutcome::Failed if attempts >= max_attempts => OutboxStatus::Failed,
            SyncOutcome::Failed => OutboxStatus::Pending,
        };
        let last_attempt_at = Utc::now();
        let details_raw = details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            UPDATE sync_queue
            SET status = ?1, attempts = ?2, last_attempt_at = ?3, details = ?4
            WHERE id = ?5
            "#,
        )
        .bind(status.as_str())
        .bind(i64::from(attempts))
        .bind(last_attempt_at.timestamp_millis())
        .bind(&details_raw)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(OutboxEntry {
            status,
            attempts,
            last_attempt_at: Some(last_attempt_at),
            details,
            ..entry
        })
    }

    async fn purge_completed(&self, older_than: Option<DateTime<Utc>>) -> Result<u64, AppError> {
        let deleted = match older_than {
            Some(cutoff) => {
                sqlx::query(
                    r#"
                    DELETE FROM sync_queue
                    WHERE status = 'completed'
                      AND last_attempt_at IS NOT NULL
                      AND last_attempt_at < ?1
                    "#,
                )
                .bind(cutoff.timestamp_millis())
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query("DELETE FROM sync_queue WHERE status = 'completed'")
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(deleted.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::ConnectionPool;
    use chrono::Duration;
    use serde_json::json;

    async fn setup_store() -> SqliteLocalStore {
        let pool = ConnectionPool::from_memory().await.unwrap();
        SqliteLocalStore::new(pool.get_pool().clone())
    }

    fn sample_listing() -> ListingDraft {
        ListingDraft {
            product_name: "Tomatoes".to_string(),
            product_type: "vegetable".to_string(),
            quantity: 50.0,
            unit: "kg".to_string(),
            price: 22.5,
            description: Some("Fresh harvest".to_string()),
            contact_info: Some("+91 98765 43210".to_string()),
            image_data: None,
        }
    }

    #[tokio::test]
    async fn insert_and_filter_listings_by_product_type() {
        let store = setup_store().await;

        store.insert_listing(sample_listing()).await.unwrap();
        let mut grains = sample_listing();
        grains.product_name = "Wheat".to_string();
        grains.product_type = "grain".to_string();
        store.insert_listing(grains).await.unwrap();

        let all = store.list_listings(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|listing| !listing.synced));

        let vegetables = store.list_listings(Some("vegetable")).await.unwrap();
        assert_eq!(vegetables.len(), 1);
        assert_eq!(vegetables[0].product_name, "Tomatoes");
    }

    #[tokio::test]
    async fn record_payload_serializes_the_full_record() {
        let store = setup_store().await;
        let id = store
            .insert_identification(IdentificationDraft {
                image_data: "base64data".to_string(),
                result: json!({"disease": "leaf blight", "confidence": 0.92}),
            })
            .await
            .unwrap();

        let payload = store
            .record_payload(RecordType::Identification, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payload.as_json()["imageData"], "base64data");
        assert_eq!(payload.as_json()["result"]["disease"], "leaf blight");
        assert_eq!(payload.as_json()["synced"], false);

        let missing = store
            .record_payload(RecordType::Marketplace, 99)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn mark_synced_flips_the_flag() {
        let store = setup_store().await;
        let id = store.insert_listing(sample_listing()).await.unwrap();

        store.mark_synced(RecordType::Marketplace, id).await.unwrap();

        let listing = store.get_listing(id).await.unwrap().unwrap();
        assert!(listing.synced);

        let err = store.mark_synced(RecordType::Marketplace, 99).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn preferences_have_replace_semantics() {
        let store = setup_store().await;

        store
            .set_preference("language", json!("hi"))
            .await
            .unwrap();
        store
            .set_preference("language", json!("mr"))
            .await
            .unwrap();

        let value = store.get_preference("language").await.unwrap();
        assert_eq!(value, Some(json!("mr")));
        assert_eq!(store.get_preference("missing").await.unwrap(), None);

        store.remove_preference("language").await.unwrap();
        assert_eq!(store.get_preference("language").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_pending_returns_oldest_first_within_limit() {
        let store = setup_store().await;

        let first = store.enqueue(RecordType::Identification, 1).await.unwrap();
        let second = store.enqueue(RecordType::Marketplace, 2).await.unwrap();
        let third = store.enqueue(RecordType::Marketplace, 3).await.unwrap();

        let pending = store.list_pending(2).await.unwrap();
        assert_eq!(
            pending.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![first, second]
        );

        let all = store.list_pending(50).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, third);
        assert!(all.iter().all(|e| e.attempts == 0));
    }

    #[tokio::test]
    async fn mark_outcome_applies_the_state_machine() {
        let store = setup_store().await;
        let id = store.enqueue(RecordType::Marketplace, 1).await.unwrap();

        // Failure below the ceiling keeps the entry retry-eligible.
        let entry = store
            .mark_outcome(id, SyncOutcome::Failed, Some(json!({"status": 503})), 3)
            .await
            .unwrap();
        assert_eq!(entry.status, OutboxStatus::Pending);
        assert_eq!(entry.attempts, 1);
        assert!(entry.last_attempt_at.is_some());
        assert_eq!(entry.details.unwrap()["status"], 503);

        store
            .mark_outcome(id, SyncOutcome::Failed, None, 3)
            .await
            .unwrap();
        let entry = store
            .mark_outcome(id, SyncOutcome::Failed, None, 3)
            .await
            .unwrap();
        assert_eq!(entry.status, OutboxStatus::Failed);
        assert_eq!(entry.attempts, 3);
    }

    #[tokio::test]
    async fn terminal_entries_are_never_reopened() {
        let store = setup_store().await;
        let id = store.enqueue(RecordType::Identification, 1).await.unwrap();

        let completed = store
            .mark_outcome(id, SyncOutcome::Completed, None, 5)
            .await
            .unwrap();
        assert_eq!(completed.status, OutboxStatus::Completed);
        assert_eq!(completed.attempts, 1);

        // A late outcome report must not change status or attempts.
        let unchanged = store
            .mark_outcome(id, SyncOutcome::Failed, None, 5)
            .await
            .unwrap();
        assert_eq!(unchanged.status, OutboxStatus::Completed);
        assert_eq!(unchanged.attempts, 1);
    }

    #[tokio::test]
    async fn mark_outcome_on_missing_entry_is_not_found() {
        let store = setup_store().await;
        let err = store
            .mark_outcome(42, SyncOutcome::Completed, None, 5)
            .await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn unrecoverable_outcome_is_terminal_regardless_of_attempts() {
        let store = setup_store().await;
        let id = store.enqueue(RecordType::Marketplace, 9).await.unwrap();

        let entry = store
            .mark_outcome(
                id,
                SyncOutcome::Unrecoverable,
                Some(json!({"reason": "record not found"})),
                5,
            )
            .await
            .unwrap();
        assert_eq!(entry.status, OutboxStatus::Failed);
        assert_eq!(entry.attempts, 1);
    }

    #[tokio::test]
    async fn purge_completed_honors_cutoff_and_is_idempotent() {
        let store = setup_store().await;

        let old = store.enqueue(RecordType::Identification, 1).await.unwrap();
        let fresh = store.enqueue(RecordType::Identification, 2).await.unwrap();
        store
            .mark_outcome(old, SyncOutcome::Completed, None, 5)
            .await
            .unwrap();
        store
            .mark_outcome(fresh, SyncOutcome::Completed, None, 5)
            .await
            .unwrap();

        // Age the first entry past the retention window.
        let eight_days_ago = (Utc::now() - Duration::days(8)).timestamp_millis();
        sqlx::query("UPDATE sync_queue SET last_attempt_at = ?1 WHERE id = ?2")
            .bind(eight_days_ago)
            .bind(old)
            .execute(&store.pool)
            .await
            .unwrap();

        let cutoff = Utc::now() - Duration::days(7);
        assert_eq!(store.purge_completed(Some(cutoff)).await.unwrap(), 1);
        assert_eq!(store.purge_completed(Some(cutoff)).await.unwrap(), 0);

        assert!(store.get_entry(old).await.unwrap().is_none());
        assert!(store.get_entry(fresh).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn purge_without_cutoff_removes_all_completed() {
        let store = setup_store().await;

        let done = store.enqueue(RecordType::Marketplace, 1).await.unwrap();
        let pending = store.enqueue(RecordType::Marketplace, 2).await.unwrap();
        store
            .mark_outcome(done, SyncOutcome::Completed, None, 5)
            .await
            .unwrap();

        assert_eq!(store.purge_completed(None).await.unwrap(), 1);
        assert!(store.get_entry(pending).await.unwrap().is_some());
    }
}
