use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A produce listing created by a farmer, possibly while offline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceListing {
    pub id: i64,
    pub product_name: String,
    pub product_type: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub image_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub synced: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub product_name: String,
    pub product_type: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub image_data: Option<String>,
}
