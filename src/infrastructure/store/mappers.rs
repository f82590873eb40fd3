use crate::domain::entities::{FinancialInfo, Identification, MarketplaceListing, OutboxEntry};
use crate::domain::value_objects::{OutboxStatus, RecordType};
use crate::infrastructure::store::rows::{
    FinancialInfoRow, IdentificationRow, MarketplaceListingRow, OutboxEntryRow,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde_json::Value;

fn timestamp_from_millis(millis: i64, column: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Storage(format!("Invalid {column} timestamp: {millis}")))
}

pub fn identification_from_row(row: IdentificationRow) -> Result<Identification, AppError> {
    let result: Value = serde_json::from_str(&row.result)?;
    Ok(Identification {
        id: row.id,
        image_data: row.image_data,
        result,
        created_at: timestamp_from_millis(row.created_at, "created_at")?,
        synced: row.synced,
    })
}

pub fn listing_from_row(row: MarketplaceListingRow) -> Result<MarketplaceListing, AppError> {
    Ok(MarketplaceListing {
        id: row.id,
        product_name: row.product_name,
        product_type: row.product_type,
        quantity: row.quantity,
        unit: row.unit,
        price: row.price,
        description: row.description,
        contact_info: row.contact_info,
        image_data: row.image_data,
        created_at: timestamp_from_millis(row.created_at, "created_at")?,
        synced: row.synced,
    })
}

pub fn financial_info_from_row(row: FinancialInfoRow) -> Result<FinancialInfo, AppError> {
    let info: Value = serde_json::from_str(&row.info)?;
    Ok(FinancialInfo {
        id: row.id,
        info,
        updated_at: timestamp_from_millis(row.updated_at, "updated_at")?,
    })
}

pub fn outbox_entry_from_row(row: OutboxEntryRow) -> Result<OutboxEntry, AppError> {
    let record_type: RecordType = row.record_type.parse().map_err(AppError::Storage)?;
    let status: OutboxStatus = row.status.parse().map_err(AppError::Storage)?;
    let details = row
        .details
        .map(|raw| serde_json::from_str::<Value>(&raw))
        .transpose()?;
    let last_attempt_at = row
        .last_attempt_at
        .map(|millis| timestamp_from_millis(millis, "last_attempt_at"))
        .transpose()?;

    Ok(OutboxEntry {
        id: row.id,
        record_type,
        record_id: row.record_id,
        status,
        attempts: row.attempts.max(0) as u32,
        last_attempt_at,
        details,
        created_at: timestamp_from_millis(row.created_at, "created_at")?,
    })
}
