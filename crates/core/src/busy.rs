use std::sync::Arc;
use tokio::sync::watch;

/// Shared "a send or timed reveal is in progress" flag
///
/// One instance exists per chat session; clones are handles to the same
/// flag. Only real transitions notify subscribers, so a view watching the
/// signal never sees a change when a value is re-set to what it already was.
#[derive(Debug, Clone)]
pub struct BusySignal {
    tx: Arc<watch::Sender<bool>>,
}

impl BusySignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_busy(&self) -> bool {
        *self.tx.borrow()
    }

    /// Set the flag, returning whether it actually changed.
    pub fn set(&self, busy: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == busy {
                false
            } else {
                *current = busy;
                true
            }
        });
        if changed {
            tracing::trace!(busy, "busy signal changed");
        }
        changed
    }

    /// Flip the flag from idle to busy; `false` if it was already busy.
    pub fn try_acquire(&self) -> bool {
        self.set(true)
    }

    pub fn release(&self) {
        self.set(false);
    }

    /// Receiver for views that render a "sending" state
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for BusySignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let busy = BusySignal::new();
        assert!(!busy.is_busy());
    }

    #[test]
    fn test_clones_share_state() {
        let busy = BusySignal::new();
        let handle = busy.clone();

        handle.set(true);
        assert!(busy.is_busy());

        busy.release();
        assert!(!handle.is_busy());
    }

    #[test]
    fn test_try_acquire_only_once() {
        let busy = BusySignal::new();
        assert!(busy.try_acquire());
        assert!(!busy.try_acquire());

        busy.release();
        assert!(busy.try_acquire());
    }

    #[test]
    fn test_redundant_set_does_not_notify() {
        let busy = BusySignal::new();
        let mut rx = busy.subscribe();

        assert!(!busy.set(false));
        assert!(!rx.has_changed().unwrap());

        assert!(busy.set(true));
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[test]
    fn test_subscriber_wakes_on_release() {
        let busy = BusySignal::new();
        busy.set(true);

        let mut rx = busy.subscribe();
        let mut changed = tokio_test::task::spawn(async move { rx.changed().await });
        tokio_test::assert_pending!(changed.poll());

        busy.release();
        assert!(changed.is_woken());
        tokio_test::assert_ready_ok!(changed.poll());
    }
}
