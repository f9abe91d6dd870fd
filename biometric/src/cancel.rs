use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;

type Listener = Box<dyn FnOnce() + Send + 'static>;

const ACTIVE: u8 = 0;
const CANCELLED: u8 = 1;
const RESOLVED: u8 = 2;

/// Cancellation handle passed along with an authentication attempt.
///
/// Clones share state. A signal ends either cancelled or resolved, never
/// both. The registered listener runs at most once, on the thread that calls
/// [`CancellationSignal::cancel`]. Once the attempt is resolved, cancelling
/// does nothing.
#[derive(Clone, Default)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    state: AtomicU8,
    listener: Mutex<Option<Listener>>,
    platform_hook: Mutex<Option<Listener>>,
    notify: Notify,
}

fn take(slot: &Mutex<Option<Listener>>) -> Option<Listener> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

impl CancellationSignal {
    /// Create a signal that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`cancel`](Self::cancel) has been called before the attempt
    /// was resolved.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.state.load(Ordering::SeqCst) == CANCELLED
    }

    /// Whether the attempt was resolved before any cancellation.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.state.load(Ordering::SeqCst) == RESOLVED
    }

    /// Cancel the attempt. Only the first call on an unresolved signal has
    /// an effect.
    ///
    /// The platform hook runs first, then the listener.
    pub fn cancel(&self) {
        if self
            .inner
            .state
            .compare_exchange(ACTIVE, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let hook = take(&self.inner.platform_hook);
        let listener = take(&self.inner.listener);

        self.inner.notify.notify_waiters();

        if let Some(hook) = hook {
            hook();
        }
        if let Some(listener) = listener {
            listener();
        }
    }

    /// Mark the attempt as finished with a platform result.
    ///
    /// Drops the listener and the platform hook. Returns `false` if the
    /// signal was cancelled first, in which case the cancellation stands.
    pub fn resolve(&self) -> bool {
        match self.inner.state.compare_exchange(
            ACTIVE,
            RESOLVED,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => {
                drop(take(&self.inner.platform_hook));
                drop(take(&self.inner.listener));
                true
            }
            Err(state) => state == RESOLVED,
        }
    }

    /// Register the cancel listener, replacing any previous one.
    ///
    /// If the signal is already cancelled the listener runs immediately. On
    /// a resolved signal it is dropped.
    pub fn set_on_cancel_listener<F>(&self, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.install(&self.inner.listener, Box::new(listener));
    }

    /// Register the hook that tears down the platform dialog on cancel.
    ///
    /// Runs alongside the cancel listener; neither replaces the other. Same
    /// timing rules as [`set_on_cancel_listener`](Self::set_on_cancel_listener).
    pub fn set_platform_hook<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.install(&self.inner.platform_hook, Box::new(hook));
    }

    fn install(&self, slot: &Mutex<Option<Listener>>, callback: Listener) {
        {
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            match self.inner.state.load(Ordering::SeqCst) {
                ACTIVE => {
                    *slot = Some(callback);
                    return;
                }
                RESOLVED => return,
                _ => {}
            }
        }
        callback();
    }

    /// Resolves once the signal is cancelled.
    ///
    /// Never resolves for a signal that was resolved instead.
    pub async fn cancelled(&self) {
        // Created before the flag check so a concurrent `cancel` cannot be missed.
        let notified = self.inner.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Whether two handles refer to the same signal.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("cancelled", &self.is_cancelled())
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hit = Arc::clone(&count);
        (count, move || {
            hit.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn listener_runs_once() {
        let signal = CancellationSignal::new();
        let (count, listener) = counter();
        signal.set_on_cancel_listener(listener);

        signal.cancel();
        signal.clone().cancel();

        assert!(signal.is_cancelled());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn late_listener_runs_immediately() {
        let signal = CancellationSignal::new();
        signal.cancel();

        let (count, listener) = counter();
        signal.set_on_cancel_listener(listener);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn replaced_listener_is_dropped() {
        let signal = CancellationSignal::new();
        let (first, listener) = counter();
        signal.set_on_cancel_listener(listener);
        let (second, listener) = counter();
        signal.set_on_cancel_listener(listener);

        signal.cancel();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fresh_signals_are_independent() {
        let old = CancellationSignal::new();
        let current = CancellationSignal::new();
        old.cancel();
        assert!(!current.is_cancelled());
        assert!(!old.same_as(&current));
        assert!(old.same_as(&old.clone()));
    }

    #[test]
    fn resolved_signal_ignores_cancel() {
        let signal = CancellationSignal::new();
        let (count, listener) = counter();
        signal.set_on_cancel_listener(listener);

        assert!(signal.resolve());
        signal.cancel();

        assert!(signal.is_resolved());
        assert!(!signal.is_cancelled());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_beats_later_resolve() {
        let signal = CancellationSignal::new();
        signal.cancel();

        assert!(!signal.resolve());
        assert!(signal.is_cancelled());
        assert!(!signal.is_resolved());
    }

    #[test]
    fn listener_set_after_resolve_is_dropped() {
        let signal = CancellationSignal::new();
        signal.resolve();

        let (count, listener) = counter();
        signal.set_on_cancel_listener(listener);
        signal.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn platform_hook_and_listener_both_run() {
        let signal = CancellationSignal::new();
        let (hooked, hook) = counter();
        let (heard, listener) = counter();
        signal.set_platform_hook(hook);
        signal.set_on_cancel_listener(listener);

        signal.cancel();
        signal.cancel();

        assert_eq!(hooked.load(Ordering::SeqCst), 1);
        assert_eq!(heard.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn late_platform_hook_runs_immediately() {
        let signal = CancellationSignal::new();
        signal.cancel();

        let (hooked, hook) = counter();
        signal.set_platform_hook(hook);
        assert_eq!(hooked.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_wakes_waiter() {
        let signal = CancellationSignal::new();
        let waiter = signal.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter woke")
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_returns_when_already_cancelled() {
        let signal = CancellationSignal::new();
        signal.cancel();
        signal.cancelled().await;
    }
}
