mod financial_info;
mod identification;
mod marketplace_listing;
mod outbox_entry;
mod sync_report;

pub use financial_info::{FinancialInfo, FinancialInfoDraft};
pub use identification::{Identification, IdentificationDraft};
pub use marketplace_listing::{ListingDraft, MarketplaceListing};
pub use outbox_entry::OutboxEntry;
pub use sync_report::SyncReport;
