//! # The publish path.
//!
//! One walk over a sublist, two passes: inline handlers first in insertion
//! order, then queued deliveries in insertion order. The walk operates on a
//! snapshot of the membership taken under the list's read lock, so handlers
//! are free to subscribe, unsubscribe (themselves or other members) and
//! publish recursively without re-entering the list lock.
//!
//! Each member's active flag and filter are re-checked under its own state
//! mutex at delivery time: a member unsubscribed mid-walk (by a handler or
//! by another thread) is skipped if not yet visited, and a queued enqueue
//! can never land after the member's terminal envelope.

use std::sync::Arc;

use crate::config;
use crate::event::{EventType, Payload, CONTROL_FAMILY};
use crate::sub::{Envelope, SubList, SubRef, SyncEvent};

/// Publishes one event to every matching member of `list`.
///
/// Returns true when the event was delivered to at least one matching
/// member, or when nothing matched; false only if every matching delivery
/// failed.
///
/// # Panics
/// Publishing a control-family event, a multi-bit subtype mask, or a safe
/// payload above the configured envelope capacity is a programmer error and
/// asserts.
pub(crate) fn publish_list(
    list: &SubList,
    etype: EventType,
    payload: Option<&Payload<'_>>,
) -> bool {
    assert!(
        etype.family() != CONTROL_FAMILY,
        "family {CONTROL_FAMILY} is reserved for hub control events"
    );
    assert!(
        etype.is_singleton(),
        "published event must carry exactly one subtype bit, got mask {:#06x}",
        etype.subtypes()
    );
    let data = payload.map(Payload::safe).unwrap_or_default();
    let capacity = config::current().max_safe_payload;
    assert!(
        data.len() <= capacity,
        "safe payload of {} bytes exceeds envelope capacity {capacity}",
        data.len()
    );

    let snapshot = list.snapshot();
    let mut matched = 0usize;
    let mut notified = 0usize;

    // Inline handlers run before any envelope of this publish is enqueued.
    for core in &snapshot {
        let crate::sub::Handler::Sync(handler) = &core.handler else {
            continue;
        };
        if !core.accepts(etype) {
            continue;
        }
        matched += 1;
        let sub = SubRef::new(Arc::clone(core));
        let event = SyncEvent::new(etype, payload.copied(), &sub);
        handler.on_event(&event);
        notified += 1;
    }

    for core in &snapshot {
        let Some(queue) = core.handler.queue() else {
            continue;
        };
        let was_empty;
        {
            // Holding the state mutex across the push keeps this enqueue
            // ordered against the member's end-of-life flip.
            let st = core.state.lock();
            if !(st.active && st.filter.matches(etype)) {
                continue;
            }
            matched += 1;
            let env = Envelope::data_envelope(etype, data, SubRef::new(Arc::clone(core)));
            was_empty = queue.push(env);
        }
        if was_empty {
            core.handler.wake();
        }
        notified += 1;
    }

    tracing::trace!(event = %etype, matched, notified, "published");
    matched == 0 || notified > 0
}
