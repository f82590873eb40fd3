use crate::domain::value_objects::{OutboxStatus, RecordType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One pending or historical synchronization obligation.
///
/// `record_id` is a weak reference: the record may already be synced, or
/// deleted locally, by the time the entry is processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutboxEntry {
    pub id: i64,
    pub record_type: RecordType,
    pub record_id: i64,
    pub status: OutboxStatus,
    pub attempts: u32,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl OutboxEntry {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
