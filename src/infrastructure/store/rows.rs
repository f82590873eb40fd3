use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct IdentificationRow {
    pub id: i64,
    pub image_data: String,
    pub result: String,
    pub created_at: i64,
    pub synced: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct MarketplaceListingRow {
    pub id: i64,
    pub product_name: String,
    pub product_type: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub image_data: Option<String>,
    pub created_at: i64,
    pub synced: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct FinancialInfoRow {
    pub id: i64,
    pub info: String,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct OutboxEntryRow {
    pub id: i64,
    pub record_type: String,
    pub record_id: i64,
    pub status: String,
    pub attempts: i64,
    pub last_attempt_at: Option<i64>,
    pub details: Option<String>,
    pub created_at: i64,
}
