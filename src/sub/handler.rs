//! # Handler descriptors.
//!
//! [`Handler`] is the three-flavor descriptor a subscription is built from:
//!
//! | Flavor | Runs | Receives |
//! |---|---|---|
//! | `Sync` | inline on the publishing thread | [`SyncEvent`] (live payload access) |
//! | `Async` | hub-owned drain worker | [`Envelope`] (frozen safe copy) |
//! | `Task` | user-supplied task | envelopes popped from the user's queue |
//!
//! The flavors are a tagged enum rather than a single dyn trait: the
//! dispatcher switches on the flavor in its walk, and only the chosen arm
//! pays for its machinery (the `Async` arm carries an inline-held queue and
//! its worker's notifier, the `Task` arm a user queue and wakeup token).
//!
//! ## Implementing handlers
//! Implement [`SyncHandler`] / [`AsyncHandler`] on your own type, or wrap a
//! closure with [`SyncFn`] / [`AsyncFn`]:
//! ```
//! use evhub::{Handler, SyncFn, SyncEvent};
//!
//! let handler = Handler::sync(SyncFn::new("audit", |ev: &SyncEvent<'_>| {
//!     let _ = ev.data();
//! }));
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::envelope::Envelope;
use super::queue::EventQueue;
use super::subscription::SyncEvent;

/// Contract for inline handlers.
///
/// Called on the publishing thread while the publish is in flight; the
/// publisher blocks until the handler returns. Only this flavor may touch
/// the payload's live region.
pub trait SyncHandler: Send + Sync + 'static {
    /// Handle a single published event.
    fn on_event(&self, event: &SyncEvent<'_>);

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Contract for queued handlers driven by a hub-owned worker.
///
/// Called from the subscription's dedicated drain worker, one envelope at a
/// time in publish order. Panics are caught and logged; the worker moves on
/// to the next envelope.
#[async_trait]
pub trait AsyncHandler: Send + Sync + 'static {
    /// Handle a single queued envelope.
    async fn on_event(&self, env: &Envelope);

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Opaque wakeup token for async-task subscriptions.
///
/// The hub invokes [`wake`](TaskWaker::wake) after a push transitions the
/// paired queue from empty to non-empty; wakeups are coalesced, so a
/// consumer must drain its queue to empty after each one. The hub never
/// introspects the token; it may notify a task, unpark a thread, or send
/// on a channel.
pub trait TaskWaker: Send + Sync + 'static {
    /// Signal the consumer that its queue has envelopes to drain.
    fn wake(&self);
}

impl TaskWaker for Notify {
    fn wake(&self) {
        self.notify_one();
    }
}

impl<W: TaskWaker + ?Sized> TaskWaker for Arc<W> {
    fn wake(&self) {
        (**self).wake();
    }
}

/// Handler descriptor: how a subscription consumes matching events.
pub enum Handler {
    /// Inline handler, invoked on the publishing thread.
    Sync(Box<dyn SyncHandler>),
    /// Queued handler drained by a hub-owned worker task.
    Async {
        /// The handler invoked per envelope.
        handler: Box<dyn AsyncHandler>,
        /// Inline-held delivery queue.
        queue: Arc<EventQueue>,
        /// Wakes the drain worker.
        notify: Arc<Notify>,
    },
    /// User-drained queue plus the token that wakes the user's task.
    Task {
        /// User-supplied delivery queue; must outlive the subscription.
        queue: Arc<EventQueue>,
        /// Wakes the user's consumer task.
        waker: Box<dyn TaskWaker>,
    },
}

impl Handler {
    /// Descriptor for an inline handler.
    pub fn sync(handler: impl SyncHandler) -> Self {
        Handler::Sync(Box::new(handler))
    }

    /// Descriptor for a queued handler; the hub owns the queue and the
    /// worker that drains it.
    pub fn async_fn(handler: impl AsyncHandler) -> Self {
        Handler::Async {
            handler: Box::new(handler),
            queue: Arc::new(EventQueue::new()),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Descriptor for a user-drained subscription.
    ///
    /// The caller keeps its own handle on `queue` and pops envelopes from
    /// it when woken through its own side of `waker`.
    pub fn task(queue: Arc<EventQueue>, waker: impl TaskWaker) -> Self {
        Handler::Task {
            queue,
            waker: Box::new(waker),
        }
    }

    /// Delivery queue for the queued flavors; `None` for sync.
    pub(crate) fn queue(&self) -> Option<&Arc<EventQueue>> {
        match self {
            Handler::Sync(_) => None,
            Handler::Async { queue, .. } | Handler::Task { queue, .. } => Some(queue),
        }
    }

    /// Wakes whichever consumer drains this subscription's queue.
    pub(crate) fn wake(&self) {
        match self {
            Handler::Sync(_) => {}
            Handler::Async { notify, .. } => notify.notify_one(),
            Handler::Task { waker, .. } => waker.wake(),
        }
    }

    pub(crate) fn flavor(&self) -> &'static str {
        match self {
            Handler::Sync(_) => "sync",
            Handler::Async { .. } => "async_fn",
            Handler::Task { .. } => "async_task",
        }
    }
}

/// Closure-backed inline handler.
///
/// Wraps `F: Fn(&SyncEvent<'_>)` together with a display name.
pub struct SyncFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncFn<F> {
    /// Creates a named closure handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> SyncHandler for SyncFn<F>
where
    F: Fn(&SyncEvent<'_>) + Send + Sync + 'static,
{
    fn on_event(&self, event: &SyncEvent<'_>) {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Closure-backed queued handler.
///
/// The closure produces a fresh future per envelope; the future owns its
/// state, so copy what you need out of the envelope before `async move`.
pub struct AsyncFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> AsyncFn<F> {
    /// Creates a named closure handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F, Fut> AsyncHandler for AsyncFn<F>
where
    F: Fn(&Envelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_event(&self, env: &Envelope) {
        (self.f)(env).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
