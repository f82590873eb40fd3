mod outbox_status;
mod payload;
mod record_type;
mod sync_outcome;

pub use outbox_status::OutboxStatus;
pub use payload::RecordPayload;
pub use record_type::RecordType;
pub use sync_outcome::SyncOutcome;
