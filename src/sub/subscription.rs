//! # Subscription records and handles.
//!
//! A subscription's storage is shared between its sublist, every queued
//! envelope that references it, and any external [`SubRef`] handles. The
//! storage (including the private data) is released when the last of
//! those goes away, which is how "free only after every in-flight envelope
//! has been consumed" falls out of ownership rather than bookkeeping.
//!
//! ## State machine
//! ```text
//!            subscribe
//!    (birth) ─────────▶ ACTIVE
//!                         │  unsubscribe / sublist destroy
//!                         ▼
//!                      INACTIVE ── last reference dropped ──▶ released
//! ```
//! The active-to-inactive flip happens under the subscription's state
//! mutex, the same mutex every queued enqueue holds, so the terminal
//! envelope pushed on that transition is strictly the last one the queue
//! delivers for this subscription, and it is pushed at most once across
//! all paths.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::HubError;
use crate::event::{EventType, Payload};

use super::envelope::Envelope;
use super::handler::Handler;
use super::list::ListCore;
use super::spec::{Private, SubSpec};

/// Monotonic internal handle counter, shared by all sublists.
static SUB_SEQ: AtomicU64 = AtomicU64::new(1);

/// Mutable subscription state, guarded by one mutex so filter reads,
/// enqueues and the end-of-life flip serialize against each other.
pub(crate) struct SubState {
    pub(crate) active: bool,
    pub(crate) filter: EventType,
}

/// Shared subscription record.
pub(crate) struct SubCore {
    /// Unique monotonic internal handle.
    pub(crate) serial: u64,
    /// Lookup id; 0 = anonymous.
    pub(crate) id: u64,
    pub(crate) state: Mutex<SubState>,
    /// Envelopes enqueued but not yet released.
    pub(crate) outstanding: AtomicUsize,
    pub(crate) handler: Handler,
    pub(crate) private: Option<Private>,
    /// Owning sublist, for unlink on unsubscribe.
    pub(crate) owner: Weak<ListCore>,
}

impl SubCore {
    pub(crate) fn from_spec(spec: SubSpec, owner: Weak<ListCore>) -> Arc<Self> {
        let (filter, handler, id, private) = spec.into_parts();
        Arc::new(Self {
            serial: SUB_SEQ.fetch_add(1, Ordering::Relaxed),
            id,
            state: Mutex::new(SubState {
                active: true,
                filter,
            }),
            outstanding: AtomicUsize::new(0),
            handler,
            private,
            owner,
        })
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Whether this subscription currently accepts the published type.
    pub(crate) fn accepts(&self, etype: EventType) -> bool {
        let st = self.state.lock();
        st.active && st.filter.matches(etype)
    }

    /// Flips the subscription to inactive; returns false if it already was.
    ///
    /// For the queued flavors this also pushes the terminal envelope while
    /// still holding the state mutex, then wakes the consumer. Shared by
    /// unsubscribe and sublist destroy, so at most one terminal envelope is
    /// ever emitted.
    pub(crate) fn deactivate(self: &Arc<Self>) -> bool {
        let wake = {
            let mut st = self.state.lock();
            if !st.active {
                return false;
            }
            st.active = false;
            self.handler
                .queue()
                .map(|queue| queue.push(Envelope::end_envelope(SubRef::new(Arc::clone(self)))))
        };
        if wake == Some(true) {
            self.handler.wake();
        }
        true
    }
}

/// Reference-counted handle on a subscription.
///
/// Returned by [`subscribe_ptr`](crate::subscribe_ptr) and by id lookups;
/// also what handlers and envelopes expose for self-management. Cloning
/// takes an additional reference, dropping releases it; the subscription's
/// storage (and private data) is released with the last reference.
pub struct SubRef {
    core: Arc<SubCore>,
}

impl SubRef {
    pub(crate) fn new(core: Arc<SubCore>) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &SubCore {
        &self.core
    }

    /// The lookup id this subscription was registered under (0 = anonymous).
    pub fn id(&self) -> u64 {
        self.core.id
    }

    /// The current event filter.
    pub fn filter(&self) -> EventType {
        self.core.state.lock().filter
    }

    /// Whether the subscription is still active (reachable from its list).
    pub fn is_active(&self) -> bool {
        self.core.is_active()
    }

    /// Envelopes enqueued for this subscription and not yet released.
    pub fn outstanding(&self) -> usize {
        self.core.outstanding.load(Ordering::Relaxed)
    }

    /// The private data attached at subscribe time, if any.
    pub fn private(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.core.private.as_deref()
    }

    /// Downcasts the private data to its concrete type.
    pub fn private_as<T: Any>(&self) -> Option<&T> {
        self.private()?.downcast_ref::<T>()
    }

    /// Ends the subscription and removes it from its sublist.
    ///
    /// Idempotent and legal from any thread, including from inside a
    /// running handler. Returns false when the subscription was already
    /// inactive. Never waits for queued envelopes to drain; for the queued
    /// flavors the terminal envelope is enqueued as the last one.
    pub fn unsubscribe(&self) -> bool {
        if !self.core.deactivate() {
            return false;
        }
        if let Some(owner) = self.core.owner.upgrade() {
            owner.unlink(self.core.serial);
        }
        tracing::debug!(serial = self.core.serial, id = self.core.id, "unsubscribed");
        true
    }

    /// Atomically replaces the event filter.
    ///
    /// The new filter takes effect for every publish that starts after this
    /// call returns.
    ///
    /// # Errors
    /// [`HubError::FamilyMismatch`] when the new filter's family differs
    /// from the current one; the filter is left unchanged.
    pub fn resubscribe(&self, filter: EventType) -> Result<(), HubError> {
        let mut st = self.core.state.lock();
        if st.filter.family() != filter.family() {
            return Err(HubError::FamilyMismatch {
                expected: st.filter.family(),
                found: filter.family(),
            });
        }
        st.filter = filter;
        Ok(())
    }
}

impl Clone for SubRef {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl fmt::Debug for SubRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubRef")
            .field("serial", &self.core.serial)
            .field("id", &self.core.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// The view an inline handler receives for one published event.
///
/// Borrowed for the duration of the handler call; the payload's live region
/// is only reachable through here.
pub struct SyncEvent<'a> {
    etype: EventType,
    payload: Option<Payload<'a>>,
    sub: &'a SubRef,
}

impl<'a> SyncEvent<'a> {
    pub(crate) fn new(etype: EventType, payload: Option<Payload<'a>>, sub: &'a SubRef) -> Self {
        Self {
            etype,
            payload,
            sub,
        }
    }

    /// The published event type (always a single subtype bit).
    pub fn event_type(&self) -> EventType {
        self.etype
    }

    /// The full payload, if the publisher passed one.
    pub fn payload(&self) -> Option<Payload<'a>> {
        self.payload
    }

    /// The safe-payload bytes (empty when the publisher sent none).
    pub fn data(&self) -> &'a [u8] {
        self.payload.map(|p| p.safe()).unwrap_or_default()
    }

    /// Downcasts the payload's live region.
    pub fn live_as<T: Any>(&self) -> Option<&'a T> {
        self.payload?.live_as::<T>()
    }

    /// Handle on the subscription being invoked; supports `filter()`,
    /// `resubscribe()` and `unsubscribe()` from inside the handler.
    pub fn sub(&self) -> &'a SubRef {
        self.sub
    }
}
