//! # Subscription specification.
//!
//! [`SubSpec`] bundles everything a subscription is created from: the event
//! filter, the handler descriptor, an optional lookup id and optional
//! private data. It is passed to [`SubList::subscribe`] or
//! [`SubList::subscribe_ptr`].
//!
//! ## Example
//! ```
//! use evhub::{sub_id, EventType, Handler, SubSpec, SyncFn, SyncEvent};
//!
//! let spec = SubSpec::new(
//!     EventType::family_wide(12),
//!     Handler::sync(SyncFn::new("watch", |_ev: &SyncEvent<'_>| {})),
//! )
//! .with_id(sub_id("demo", "watch"))
//! .with_private(vec![0u8; 8]);
//!
//! assert_ne!(spec.id(), 0);
//! ```
//!
//! [`SubList::subscribe`]: crate::SubList::subscribe
//! [`SubList::subscribe_ptr`]: crate::SubList::subscribe_ptr

use std::any::Any;

use crate::event::EventType;

use super::handler::Handler;

pub(crate) type Private = Box<dyn Any + Send + Sync>;

/// # Specification for a new subscription.
///
/// Bundles together:
/// - The event filter ([`EventType`]; a zero mask covers the whole family)
/// - The handler descriptor ([`Handler`])
/// - Optional lookup id (0 = anonymous, not found by id lookups)
/// - Optional private data, released exactly once when the subscription's
///   storage is released
pub struct SubSpec {
    filter: EventType,
    handler: Handler,
    id: u64,
    private: Option<Private>,
}

impl SubSpec {
    /// Creates an anonymous specification with no private data.
    pub fn new(filter: EventType, handler: Handler) -> Self {
        Self {
            filter,
            handler,
            id: 0,
            private: None,
        }
    }

    /// Attaches a lookup id (see [`sub_id`](crate::sub_id)); id 0 keeps the
    /// subscription anonymous.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Attaches private data owned by the subscription.
    ///
    /// Dropped exactly once, only after the subscription is inactive, every
    /// queued envelope referencing it has been released, and no external
    /// handle remains.
    pub fn with_private<T: Any + Send + Sync>(mut self, private: T) -> Self {
        self.private = Some(Box::new(private));
        self
    }

    /// The event filter.
    pub fn filter(&self) -> EventType {
        self.filter
    }

    /// The lookup id (0 = anonymous).
    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn handler(&self) -> &Handler {
        &self.handler
    }

    pub(crate) fn into_parts(self) -> (EventType, Handler, u64, Option<Private>) {
        (self.filter, self.handler, self.id, self.private)
    }
}
