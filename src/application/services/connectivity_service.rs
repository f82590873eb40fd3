use crate::application::ports::connectivity::{LinkState, LivenessProbe};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Best-effort "can we reach the server right now" signal, distinct from the
/// platform's raw link state. The link indicator short-circuits the offline
/// case; an up link is only a hint and is always re-validated with a probe.
pub struct ConnectivityMonitor {
    link: Arc<dyn LinkState>,
    probe: Arc<dyn LivenessProbe>,
}

/// Disposer for one connectivity subscription. Dropping it (or calling
/// `unsubscribe`) stops that subscriber without affecting others.
pub struct ConnectivitySubscription {
    handle: JoinHandle<()>,
}

impl ConnectivitySubscription {
    pub fn unsubscribe(self) {
        self.handle.abort();
    }
}

impl Drop for ConnectivitySubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl ConnectivityMonitor {
    pub fn new(link: Arc<dyn LinkState>, probe: Arc<dyn LivenessProbe>) -> Self {
        Self { link, probe }
    }

    /// Current reachability. Side-effect-free apart from the network probe.
    pub async fn check_now(&self) -> bool {
        if !self.link.is_up() {
            return false;
        }
        self.probe.ping().await
    }

    /// Register callbacks for connectivity transitions. Fires once with the
    /// validated initial state, then on every link-state event after
    /// re-validating with `check_now`; the platform event alone is never
    /// trusted.
    pub fn subscribe<F, G>(self: &Arc<Self>, on_online: F, on_offline: G) -> ConnectivitySubscription
    where
        F: Fn() + Send + Sync + 'static,
        G: Fn() + Send + Sync + 'static,
    {
        let monitor = Arc::clone(self);
        let mut link_events = self.link.changes();

        let handle = tokio::spawn(async move {
            let mut notify = |online: bool| {
                if online {
                    on_online();
                } else {
                    on_offline();
                }
            };

            notify(monitor.check_now().await);

            while link_events.changed().await.is_ok() {
                let online = monitor.check_now().await;
                debug!(online, "connectivity transition validated");
                notify(online);
            }
        });

        ConnectivitySubscription { handle }
    }
}
