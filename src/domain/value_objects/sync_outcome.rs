/// Outcome of one processing attempt, as reported to the queue manager.
///
/// `Failed` leaves the entry retry-eligible until the attempt ceiling is
/// reached; `Unrecoverable` abandons the entry immediately (missing record,
/// exhausted attempts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed,
    Failed,
    Unrecoverable,
}
