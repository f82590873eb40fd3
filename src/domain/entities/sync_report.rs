use serde::{Deserialize, Serialize};

/// Aggregate statistics for one sync pass: entries transitioned to
/// `completed` and entries transitioned to terminal `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub success: bool,
    pub synced: u32,
    pub failed: u32,
}

impl SyncReport {
    /// Zero-progress report for a pass that could not run (offline, already
    /// in flight, orchestration failure).
    pub fn aborted() -> Self {
        Self::default()
    }

    pub fn completed(synced: u32, failed: u32) -> Self {
        Self {
            success: true,
            synced,
            failed,
        }
    }
}
