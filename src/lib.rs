pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::services::{
    ConnectivityMonitor, ConnectivitySubscription, OutboxService, RecordService, SyncService,
    SyncStatus,
};
pub use domain::entities::SyncReport;
pub use domain::value_objects::{OutboxStatus, RecordType};
pub use shared::config::AppConfig;
pub use shared::error::AppError;
pub use state::AppState;

/// Install the global tracing subscriber. Call once at host startup; tests
/// leave logging uninitialized.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "krushimind_sync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
