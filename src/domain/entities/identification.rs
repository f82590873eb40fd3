use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A crop-disease identification captured on the device. The analysis result
/// is stored verbatim as returned by the analysis provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Identification {
    pub id: i64,
    pub image_data: String,
    pub result: Value,
    pub created_at: DateTime<Utc>,
    pub synced: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationDraft {
    pub image_data: String,
    pub result: Value,
}
