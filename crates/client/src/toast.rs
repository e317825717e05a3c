//! Transient user notifications ("toasts").
//!
//! A [`Toasts`] handle is an explicit store object passed to whichever
//! containers and views need it - there is no process-wide singleton, so
//! tests can run isolated queues side by side.
//!
//! Lifecycle: a pushed toast starts `open`; dismissal (explicit or the
//! auto-dismiss timer) flips it to closed but keeps it in the collection so
//! a view can animate its exit; after [`REMOVE_DELAY`] it is purged
//! entirely. The queue keeps at most [`TOAST_LIMIT`] toasts, newest first.
//!
//! Subscribers receive every state change synchronously and are dropped when
//! their [`ToastSubscription`] handle goes out of scope.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

/// Maximum number of toasts held at once; pushing beyond it evicts the oldest.
pub const TOAST_LIMIT: usize = 1;
/// How long a toast stays open before it is dismissed automatically.
pub const AUTO_DISMISS_DELAY: Duration = Duration::from_secs(5);
/// How long a dismissed toast lingers (closed) before it is purged.
pub const REMOVE_DELAY: Duration = Duration::from_secs(1);

/// Monotonically increasing toast identifier.
pub type ToastId = u64;

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    /// Errors and destructive outcomes.
    Destructive,
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    /// False once dismissed; the toast stays queued until purged.
    pub open: bool,
}

/// The data a caller supplies when pushing a toast.
#[derive(Debug, Clone)]
pub struct ToastRequest {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl ToastRequest {
    /// A default-variant notification.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    /// A destructive-variant notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }
}

type SubscriberCallback = Arc<dyn Fn(&[Toast]) + Send + Sync>;

struct ToastsState {
    toasts: Vec<Toast>,
    next_id: ToastId,
    scheduled_removals: HashSet<ToastId>,
}

struct ToastsInner {
    state: Mutex<ToastsState>,
    subscribers: Mutex<Vec<(u64, SubscriberCallback)>>,
    next_subscriber_id: Mutex<u64>,
}

/// Shared toast queue handle. Cheap to clone; clones share one queue.
#[derive(Clone)]
pub struct Toasts {
    inner: Arc<ToastsInner>,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl Toasts {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ToastsInner {
                state: Mutex::new(ToastsState {
                    toasts: Vec::new(),
                    next_id: 0,
                    scheduled_removals: HashSet::new(),
                }),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber_id: Mutex::new(0),
            }),
        }
    }

    /// Enqueue a toast and schedule its auto-dismissal.
    ///
    /// Returns the id, usable with [`Toasts::dismiss`].
    pub fn push(&self, request: ToastRequest) -> ToastId {
        let (id, snapshot) = {
            let mut state = self.lock_state();
            state.next_id = state.next_id.wrapping_add(1);
            let id = state.next_id;
            state.toasts.insert(
                0,
                Toast {
                    id,
                    title: request.title,
                    description: request.description,
                    variant: request.variant,
                    open: true,
                },
            );
            state.toasts.truncate(TOAST_LIMIT);
            (id, state.toasts.clone())
        };

        self.notify(&snapshot);
        self.schedule(AUTO_DISMISS_DELAY, id, Action::Dismiss);
        id
    }

    /// Close a toast. It stays queued (for exit animation) until purged.
    pub fn dismiss(&self, id: ToastId) {
        let snapshot = {
            let mut state = self.lock_state();
            let Some(toast) = state.toasts.iter_mut().find(|t| t.id == id) else {
                return;
            };
            toast.open = false;
            state.toasts.clone()
        };

        self.notify(&snapshot);
        self.schedule_removal(id);
    }

    /// Close every queued toast.
    pub fn dismiss_all(&self) {
        let (ids, snapshot) = {
            let mut state = self.lock_state();
            for toast in &mut state.toasts {
                toast.open = false;
            }
            let ids: Vec<ToastId> = state.toasts.iter().map(|t| t.id).collect();
            (ids, state.toasts.clone())
        };

        self.notify(&snapshot);
        for id in ids {
            self.schedule_removal(id);
        }
    }

    /// Current queue contents, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock_state().toasts.clone()
    }

    /// Register a callback invoked synchronously on every state change.
    ///
    /// The callback fires immediately with the current queue, then on each
    /// change until the returned subscription is dropped.
    pub fn subscribe(
        &self,
        callback: impl Fn(&[Toast]) + Send + Sync + 'static,
    ) -> ToastSubscription {
        let callback: SubscriberCallback = Arc::new(callback);
        let id = {
            let mut next = self
                .inner
                .next_subscriber_id
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *next = next.wrapping_add(1);
            *next
        };

        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&callback)));

        callback(&self.snapshot());

        ToastSubscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ToastsState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Fan out a snapshot to all subscribers, outside the state lock.
    fn notify(&self, snapshot: &[Toast]) {
        let callbacks: Vec<SubscriberCallback> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(snapshot);
        }
    }

    /// Queue a purge for a dismissed toast, once per id.
    fn schedule_removal(&self, id: ToastId) {
        {
            let mut state = self.lock_state();
            if !state.scheduled_removals.insert(id) {
                return;
            }
        }
        self.schedule(REMOVE_DELAY, id, Action::Remove);
    }

    fn remove(&self, id: ToastId) {
        let snapshot = {
            let mut state = self.lock_state();
            state.scheduled_removals.remove(&id);
            let before = state.toasts.len();
            state.toasts.retain(|t| t.id != id);
            if state.toasts.len() == before {
                return;
            }
            state.toasts.clone()
        };
        self.notify(&snapshot);
    }

    /// Run a delayed action against the queue without keeping it alive.
    ///
    /// Outside a tokio runtime (plain sync callers) timers cannot run; the
    /// toast then stays until dismissed or evicted by a newer one.
    fn schedule(&self, delay: Duration, id: ToastId, action: Action) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let weak: Weak<ToastsInner> = Arc::downgrade(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                let toasts = Self { inner };
                match action {
                    Action::Dismiss => toasts.dismiss(id),
                    Action::Remove => toasts.remove(id),
                }
            }
        });
    }
}

#[derive(Clone, Copy)]
enum Action {
    Dismiss,
    Remove,
}

/// Disposer handle returned by [`Toasts::subscribe`]; dropping it
/// unregisters the callback.
pub struct ToastSubscription {
    id: u64,
    inner: Weak<ToastsInner>,
}

impl Drop for ToastSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn let_timers_run(past: Duration) {
        tokio::time::sleep(past + Duration::from_millis(50)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_never_exceeds_cap() {
        let toasts = Toasts::new();
        for i in 0..10 {
            toasts.push(ToastRequest::new(format!("toast {i}"), ""));
            assert!(toasts.snapshot().len() <= TOAST_LIMIT);
        }
        // Newest kept
        let snapshot = toasts.snapshot();
        assert_eq!(snapshot.first().unwrap().title, "toast 9");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_closes_then_purges() {
        let toasts = Toasts::new();
        let id = toasts.push(ToastRequest::new("Item added", "Tote added to cart."));

        toasts.dismiss(id);
        let snapshot = toasts.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.first().unwrap().open);

        let_timers_run(REMOVE_DELAY).await;
        assert!(toasts.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss_after_delay() {
        let toasts = Toasts::new();
        toasts.push(ToastRequest::new("Signed out", ""));

        let_timers_run(AUTO_DISMISS_DELAY).await;
        let snapshot = toasts.snapshot();
        assert!(snapshot.is_empty() || !snapshot.first().unwrap().open);

        let_timers_run(REMOVE_DELAY).await;
        assert!(toasts.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_receive_updates_until_dropped() {
        let toasts = Toasts::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_clone = Arc::clone(&seen);
        let subscription = toasts.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });
        // Fired once immediately with the current queue
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        toasts.push(ToastRequest::new("one", ""));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        drop(subscription);
        toasts.push(ToastRequest::new("two", ""));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_all() {
        let toasts = Toasts::new();
        toasts.push(ToastRequest::destructive("Login error", "bad credentials"));
        toasts.dismiss_all();
        assert!(toasts.snapshot().iter().all(|t| !t.open));

        let_timers_run(REMOVE_DELAY).await;
        assert!(toasts.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissing_unknown_id_is_a_noop() {
        let toasts = Toasts::new();
        toasts.push(ToastRequest::new("kept", ""));
        toasts.dismiss(9999);
        assert_eq!(toasts.snapshot().len(), 1);
        assert!(toasts.snapshot().first().unwrap().open);
    }
}
