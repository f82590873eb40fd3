use crate::application::ports::connectivity::LinkState;
use tokio::sync::watch;

/// Process-wide link-state holder fed by whatever platform signal the host
/// application has (network-change events, OS callbacks). Watchers see every
/// transition pushed through `set_up`.
pub struct SharedLinkState {
    tx: watch::Sender<bool>,
}

impl SharedLinkState {
    pub fn new(initially_up: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_up);
        Self { tx }
    }

    pub fn set_up(&self, up: bool) {
        self.tx.send_replace(up);
    }
}

impl LinkState for SharedLinkState {
    fn is_up(&self) -> bool {
        *self.tx.borrow()
    }

    fn changes(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transitions_reach_watchers() {
        let link = SharedLinkState::new(false);
        let mut rx = link.changes();

        assert!(!link.is_up());
        link.set_up(true);

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(link.is_up());
    }
}
