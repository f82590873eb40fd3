mod connectivity_service;
mod outbox_service;
mod record_service;
mod sync_service;

pub use connectivity_service::{ConnectivityMonitor, ConnectivitySubscription};
pub use outbox_service::OutboxService;
pub use record_service::RecordService;
pub use sync_service::{SyncService, SyncStatus};
