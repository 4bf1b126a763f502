//! # Subscription lists.
//!
//! A [`SubList`] is an ordered set of subscriptions sharing one
//! reader/writer lock: publishes snapshot the membership under a read hold,
//! while subscribe, unsubscribe and destroy take the write side. Insertion
//! order is delivery order within a publish.
//!
//! The process-wide global sublist (see [`global`](crate::global)) differs
//! from user-created ones only by lifetime. User lists run their destroy
//! path when the last handle drops, so an async-task consumer always gets
//! its terminal envelope even if the owner forgets to call
//! [`destroy`](SubList::destroy).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::HubError;
use crate::event::{EventType, Payload};

use super::subscription::{SubCore, SubRef};
use super::spec::SubSpec;

pub(crate) struct ListCore {
    members: RwLock<Vec<Arc<SubCore>>>,
    destroyed: AtomicBool,
}

impl ListCore {
    /// Removes one member by internal handle.
    pub(crate) fn unlink(&self, serial: u64) {
        self.members.write().retain(|m| m.serial != serial);
    }

    /// Marks every member inactive (emitting terminal envelopes), drops the
    /// list's references to them, and refuses new members from now on.
    pub(crate) fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        let drained = std::mem::take(&mut *self.members.write());
        for core in &drained {
            core.deactivate();
        }
        if !drained.is_empty() {
            tracing::debug!(members = drained.len(), "sublist destroyed");
        }
    }
}

impl Drop for ListCore {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// An ordered, lock-protected set of subscriptions.
///
/// Cheap to clone; clones share the same membership.
#[derive(Clone)]
pub struct SubList {
    core: Arc<ListCore>,
}

impl SubList {
    /// Creates an empty sublist.
    pub fn new() -> Self {
        Self {
            core: Arc::new(ListCore {
                members: RwLock::new(Vec::new()),
                destroyed: AtomicBool::new(false),
            }),
        }
    }

    /// Number of active members.
    pub fn len(&self) -> usize {
        self.core.members.read().len()
    }

    /// Whether the list currently has no members.
    pub fn is_empty(&self) -> bool {
        self.core.members.read().is_empty()
    }

    /// Tears the list down: every member goes inactive (async-task members
    /// receive their terminal envelope), the list's references are dropped,
    /// and later subscribes fail with [`HubError::Destroyed`].
    ///
    /// Idempotent. Queued envelopes already delivered remain valid; each
    /// member's storage is released once its envelopes drain and no
    /// external handle remains.
    pub fn destroy(&self) {
        self.core.destroy();
    }

    /// Registers a subscription described by `spec`.
    ///
    /// # Errors
    /// [`HubError::Destroyed`] when the list has been destroyed;
    /// [`HubError::NoRuntime`] for an async-handler flavor outside a tokio
    /// runtime.
    pub fn subscribe(&self, spec: SubSpec) -> Result<(), HubError> {
        self.subscribe_ptr(spec).map(drop)
    }

    /// Registers a subscription and returns an owned handle on it.
    ///
    /// The handle is an additional reference: the subscription's storage is
    /// not released until the handle is dropped, even after unsubscribe and
    /// queue drain.
    ///
    /// # Errors
    /// Same as [`subscribe`](Self::subscribe).
    pub fn subscribe_ptr(&self, spec: SubSpec) -> Result<SubRef, HubError> {
        let needs_worker = matches!(spec.handler(), super::handler::Handler::Async { .. });
        if needs_worker && tokio::runtime::Handle::try_current().is_err() {
            return Err(HubError::NoRuntime);
        }
        let core = SubCore::from_spec(spec, Arc::downgrade(&self.core));
        self.insert(Arc::clone(&core))?;
        if needs_worker {
            crate::hub::worker::spawn(Arc::clone(&core));
        }
        tracing::debug!(
            serial = core.serial,
            id = core.id,
            flavor = core.handler.flavor(),
            "subscribed"
        );
        Ok(SubRef::new(core))
    }

    /// Finds an identified, active member and returns an owned handle.
    ///
    /// Anonymous subscriptions (id 0) are never returned.
    pub fn lookup_take(&self, id: u64) -> Option<SubRef> {
        if id == 0 {
            return None;
        }
        let members = self.core.members.read();
        members
            .iter()
            .find(|m| m.id == id && m.is_active())
            .map(|m| SubRef::new(Arc::clone(m)))
    }

    /// Unsubscribes the identified member; false when no such member
    /// exists (or it is already inactive).
    pub fn lookup_unsubscribe(&self, id: u64) -> bool {
        self.lookup_take(id)
            .map(|sub| sub.unsubscribe())
            .unwrap_or(false)
    }

    /// Replaces the identified member's filter.
    ///
    /// # Errors
    /// [`HubError::NotFound`] when no such member exists;
    /// [`HubError::FamilyMismatch`] when the new filter changes family.
    pub fn lookup_resubscribe(&self, id: u64, filter: EventType) -> Result<(), HubError> {
        match self.lookup_take(id) {
            Some(sub) => sub.resubscribe(filter),
            None => Err(HubError::NotFound { id }),
        }
    }

    /// Publishes an event to every matching member of this list.
    ///
    /// See the module-level contract on [`publish`](crate::publish).
    pub fn publish(&self, etype: EventType, payload: Option<&Payload<'_>>) -> bool {
        crate::hub::dispatch::publish_list(self, etype, payload)
    }

    fn insert(&self, core: Arc<SubCore>) -> Result<(), HubError> {
        let mut members = self.core.members.write();
        if self.core.destroyed.load(Ordering::Acquire) {
            return Err(HubError::Destroyed);
        }
        members.push(core);
        Ok(())
    }

    /// Arc-clone of the current membership, walked without holding the lock.
    pub(crate) fn snapshot(&self) -> Vec<Arc<SubCore>> {
        self.core.members.read().clone()
    }
}

impl Default for SubList {
    fn default() -> Self {
        Self::new()
    }
}
