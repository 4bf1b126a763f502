//! # The hub surface: global sublist and list-parameterized operations.
//!
//! Every operation here takes `Option<&SubList>`; `None` targets the
//! process-wide global sublist, which is created on first use (or by
//! [`init`]) and lives for the process lifetime. Modules that own their own
//! event scope create private [`SubList`]s instead and pass `Some`.

use std::sync::OnceLock;

use crate::config::{self, HubConfig};
use crate::error::HubError;
use crate::event::{EventType, Payload};
use crate::sub::{SubList, SubRef, SubSpec};

pub(crate) mod dispatch;
pub(crate) mod worker;

/// Process-wide sublist, lazily created.
static GLOBAL: OnceLock<SubList> = OnceLock::new();

/// Installs the hub configuration and creates the global sublist.
///
/// Optional: the global sublist also comes to life on first use with
/// default configuration.
///
/// # Panics
/// Panics if a configuration has already been installed.
pub fn init(cfg: HubConfig) {
    config::install(cfg);
    let _ = global();
}

/// The process-wide global sublist.
pub fn global() -> &'static SubList {
    GLOBAL.get_or_init(SubList::new)
}

/// Tears down the global sublist: every member goes inactive and async-task
/// members receive their terminal envelope. Intended for process teardown;
/// afterwards subscribes against the global list fail with
/// [`HubError::Destroyed`].
pub fn shutdown() {
    if let Some(list) = GLOBAL.get() {
        list.destroy();
    }
}

fn resolve(list: Option<&SubList>) -> &SubList {
    list.unwrap_or_else(|| global())
}

/// Registers a subscription on `list` (`None` = global).
///
/// # Errors
/// See [`SubList::subscribe`].
pub fn subscribe(list: Option<&SubList>, spec: SubSpec) -> Result<(), HubError> {
    resolve(list).subscribe(spec)
}

/// Registers a subscription and returns an owned handle on it.
///
/// # Errors
/// See [`SubList::subscribe_ptr`].
pub fn subscribe_ptr(list: Option<&SubList>, spec: SubSpec) -> Result<SubRef, HubError> {
    resolve(list).subscribe_ptr(spec)
}

/// Finds an identified, active subscription and returns an owned handle.
pub fn lookup_take(list: Option<&SubList>, id: u64) -> Option<SubRef> {
    resolve(list).lookup_take(id)
}

/// Unsubscribes the identified subscription; false when absent or already
/// inactive.
pub fn lookup_unsubscribe(list: Option<&SubList>, id: u64) -> bool {
    resolve(list).lookup_unsubscribe(id)
}

/// Replaces the identified subscription's filter.
///
/// # Errors
/// See [`SubList::lookup_resubscribe`].
pub fn lookup_resubscribe(
    list: Option<&SubList>,
    id: u64,
    filter: EventType,
) -> Result<(), HubError> {
    resolve(list).lookup_resubscribe(id, filter)
}

/// Publishes one event to every matching subscription of `list`
/// (`None` = global).
///
/// Inline handlers run on this thread before any envelope is enqueued;
/// queued deliveries are enqueued in insertion order and consumed
/// concurrently by their owners. Returns true when at least one matching
/// subscription was notified, or when nothing matched.
///
/// # Panics
/// Asserts on control-family events, multi-bit subtype masks, and safe
/// payloads above the configured envelope capacity.
pub fn publish(list: Option<&SubList>, etype: EventType, payload: Option<&Payload<'_>>) -> bool {
    resolve(list).publish(etype, payload)
}

/// Derives a stable subscription id from a scope and a name.
///
/// FNV-1a over the two byte strings; stable across runs and platforms.
/// Callers own scope uniqueness. Collisions are tolerated;
/// [`subscribe_ptr`] is the escape hatch for callers that cannot accept
/// the risk. An input hashing to 0 would make the subscription anonymous.
pub fn sub_id(scope: &str, name: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in scope.bytes().chain([b':']).chain(name.bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
