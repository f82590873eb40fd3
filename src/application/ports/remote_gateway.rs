use crate::domain::value_objects::{RecordPayload, RecordType};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Result of a push the server actually answered. Transport-level failures
/// (timeout, refused connection) surface as `Err` from `push` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Accepted { remote_id: Option<String> },
    Rejected { status: u16, detail: Option<String> },
}

impl PushOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PushOutcome::Accepted { .. })
    }
}

/// Stateless client for the remote push endpoints, one record at a time.
/// Duplicate pushes after a false-negative timeout are an accepted tradeoff;
/// the protocol carries no idempotency key.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn push(
        &self,
        record_type: RecordType,
        payload: &RecordPayload,
    ) -> Result<PushOutcome, AppError>;
}
