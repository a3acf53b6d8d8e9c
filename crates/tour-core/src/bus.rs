//! The "tour may now launch" signal.
//!
//! The signal carries no payload. Subscribers re-read the store when it
//! fires, so a stale or duplicated signal can at worst cause a redundant
//! store read.

use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSignal;

#[derive(Debug, Clone)]
pub struct LaunchBus {
    tx: broadcast::Sender<LaunchSignal>,
}

impl Default for LaunchBus {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LaunchSignal> {
        self.tx.subscribe()
    }

    /// Fire immediately. Returns how many subscribers were listening.
    pub fn dispatch(&self) -> usize {
        let delivered = self.tx.send(LaunchSignal).unwrap_or(0);
        tracing::debug!(delivered, "launch signal dispatched");
        delivered
    }

    /// Fire after `delay`, giving a freshly navigated page time to mount.
    ///
    /// Outside a Tokio runtime (synchronous callers and unit tests) the signal
    /// fires immediately.
    pub fn dispatch_after(&self, delay: Duration) {
        if tokio::runtime::Handle::try_current().is_ok() {
            let bus = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                bus.dispatch();
            });
        } else {
            self.dispatch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_without_subscribers_is_harmless() {
        let bus = LaunchBus::new();
        assert_eq!(bus.dispatch(), 0);
    }

    #[test]
    fn sync_dispatch_after_fires_immediately() {
        let bus = LaunchBus::new();
        let mut rx = bus.subscribe();
        bus.dispatch_after(Duration::from_millis(100));
        assert_eq!(rx.try_recv().unwrap(), LaunchSignal);
    }

    #[tokio::test(start_paused = true)]
    async fn async_dispatch_after_waits_for_delay() {
        let bus = LaunchBus::new();
        let mut rx = bus.subscribe();
        bus.dispatch_after(Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(rx.try_recv().unwrap(), LaunchSignal);
    }
}
