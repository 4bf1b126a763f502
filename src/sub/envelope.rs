//! # Queued event envelopes.
//!
//! An [`Envelope`] is what an async subscriber receives: the event type, a
//! frozen copy of the publisher's safe payload bytes, and a handle on the
//! owning subscription. Each envelope holds one reference on its
//! subscription and counts toward its `outstanding` total, so the
//! subscription's storage (and its private data) cannot be released while
//! any envelope referencing it is still alive. Dropping the envelope is
//! what releases it; there is no separate free call.

use std::any::Any;
use std::sync::atomic::Ordering;

use crate::event::{EventType, SUB_END};

use super::subscription::SubRef;

/// A dispatcher-allocated, queue-borne event record.
pub struct Envelope {
    etype: EventType,
    data: Box<[u8]>,
    sub: SubRef,
}

impl Envelope {
    /// Builds a data envelope, freezing a copy of the safe payload bytes.
    pub(crate) fn data_envelope(etype: EventType, data: &[u8], sub: SubRef) -> Self {
        sub.core().outstanding.fetch_add(1, Ordering::Relaxed);
        Self {
            etype,
            data: Box::from(data),
            sub,
        }
    }

    /// Builds the terminal envelope for a subscription that just ended.
    pub(crate) fn end_envelope(sub: SubRef) -> Self {
        sub.core().outstanding.fetch_add(1, Ordering::Relaxed);
        Self {
            etype: SUB_END,
            data: Vec::new().into_boxed_slice(),
            sub,
        }
    }

    /// The event type this envelope carries.
    pub fn event_type(&self) -> EventType {
        self.etype
    }

    /// The frozen safe-payload bytes (empty when the publisher sent none).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether this is the terminal envelope for its subscription.
    ///
    /// After a terminal envelope, the queue delivers nothing further for
    /// that subscription; the consumer may release its own resources.
    pub fn is_end(&self) -> bool {
        self.etype == SUB_END
    }

    /// Handle on the subscription this envelope was delivered for.
    pub fn sub(&self) -> &SubRef {
        &self.sub
    }

    /// The subscription's private data, if any was attached at subscribe.
    pub fn private(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.sub.private()
    }

    /// Downcasts the private data to its concrete type.
    pub fn private_as<T: Any>(&self) -> Option<&T> {
        self.sub.private_as::<T>()
    }
}

impl Drop for Envelope {
    fn drop(&mut self) {
        // Releases this envelope's share of the subscription; the owned
        // reference itself is dropped with the `sub` field.
        self.sub.core().outstanding.fetch_sub(1, Ordering::Relaxed);
    }
}
