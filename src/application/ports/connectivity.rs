use async_trait::async_trait;
use tokio::sync::watch;

/// Platform-level link-state indicator. A raised link is a hint, not a
/// guarantee of reachability; the monitor always re-probes before trusting it.
pub trait LinkState: Send + Sync {
    fn is_up(&self) -> bool;
    fn changes(&self) -> watch::Receiver<bool>;
}

/// Lightweight reachability probe against the remote server's liveness
/// endpoint. An ambiguous result (timeout, transport error) reads as offline.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn ping(&self) -> bool;
}
