use crate::application::ports::local_store::{PreferenceStore, RecordStore};
use crate::application::services::outbox_service::OutboxService;
use crate::domain::entities::{
    FinancialInfo, FinancialInfoDraft, Identification, IdentificationDraft, ListingDraft,
    MarketplaceListing,
};
use crate::domain::value_objects::RecordType;
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;

/// Creation and query flows for domain records. Every syncable write also
/// enqueues an outbox entry in the same logical operation, so no record is
/// ever created without its sync obligation.
pub struct RecordService {
    records: Arc<dyn RecordStore>,
    preferences: Arc<dyn PreferenceStore>,
    outbox: Arc<OutboxService>,
}

impl RecordService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        preferences: Arc<dyn PreferenceStore>,
        outbox: Arc<OutboxService>,
    ) -> Self {
        Self {
            records,
            preferences,
            outbox,
        }
    }

    pub async fn store_identification(&self, draft: IdentificationDraft) -> Result<i64, AppError> {
        let id = self.records.insert_identification(draft).await?;
        self.outbox.enqueue(RecordType::Identification, id).await;
        Ok(id)
    }

    pub async fn store_listing(&self, draft: ListingDraft) -> Result<i64, AppError> {
        let id = self.records.insert_listing(draft).await?;
        self.outbox.enqueue(RecordType::Marketplace, id).await;
        Ok(id)
    }

    /// Financial info is local-only reference data; it carries no sync
    /// obligation.
    pub async fn store_financial_info(&self, draft: FinancialInfoDraft) -> Result<i64, AppError> {
        self.records.put_financial_info(draft).await
    }

    pub async fn identifications(&self) -> Result<Vec<Identification>, AppError> {
        self.records.list_identifications().await
    }

    pub async fn get_identification(&self, id: i64) -> Result<Option<Identification>, AppError> {
        self.records.get_identification(id).await
    }

    pub async fn listings(
        &self,
        product_type: Option<&str>,
    ) -> Result<Vec<MarketplaceListing>, AppError> {
        self.records.list_listings(product_type).await
    }

    pub async fn get_listing(&self, id: i64) -> Result<Option<MarketplaceListing>, AppError> {
        self.records.get_listing(id).await
    }

    pub async fn financial_info(&self) -> Result<Vec<FinancialInfo>, AppError> {
        self.records.list_financial_info().await
    }

    pub async fn get_financial_info(&self, id: i64) -> Result<Option<FinancialInfo>, AppError> {
        self.records.get_financial_info(id).await
    }

    /// Delete a syncable record. Any still-pending outbox entry for it fails
    /// terminally on the next pass ("record not found").
    pub async fn delete_record(&self, record_type: RecordType, id: i64) -> Result<(), AppError> {
        self.records.delete_record(record_type, id).await
    }

    pub async fn delete_financial_info(&self, id: i64) -> Result<(), AppError> {
        self.records.delete_financial_info(id).await
    }

    pub async fn set_preference(&self, key: &str, value: Value) -> Result<(), AppError> {
        self.preferences.set_preference(key, value).await
    }

    pub async fn get_preference(&self, key: &str) -> Result<Option<Value>, AppError> {
        self.preferences.get_preference(key).await
    }

    pub async fn remove_preference(&self, key: &str) -> Result<(), AppError> {
        self.preferences.remove_preference(key).await
    }
}
