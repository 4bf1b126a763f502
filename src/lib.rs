//! # evhub
//!
//! **evhub** is an in-process event notification hub: typed publish/subscribe
//! for multi-threaded services.
//!
//! Publishers emit `(family, subtype)` events; subscribers register handlers
//! that run either inline on the publishing thread, with access to live
//! caller-owned payload data, or decoupled through per-subscription FIFO
//! queues drained by worker or user tasks.
//!
//! | Area | Description | Key types / traits |
//! |------|-------------|--------------------|
//! | **Event algebra** | Family + subtype-bitmask types, name registry. | [`EventType`], [`register_family`] |
//! | **Subscriptions** | Filtered, id-addressable, reference-counted records. | [`SubSpec`], [`SubRef`] |
//! | **Sublists** | Ordered subscription sets; one global, any number scoped. | [`SubList`], [`global`] |
//! | **Delivery** | Inline, worker-drained, or user-task-drained handlers. | [`Handler`], [`SyncHandler`], [`AsyncHandler`] |
//! | **Queues** | Per-subscription FIFO plus opaque wakeup tokens. | [`EventQueue`], [`TaskWaker`] |
//! | **Errors** | Typed recoverable failures; contract violations assert. | [`HubError`] |
//!
//! ## Delivery guarantees
//! - Within one subscription, envelopes arrive in publish order (FIFO).
//! - Within one publish, inline handlers run before any envelope is enqueued.
//! - Across distinct subscriptions, no ordering is guaranteed.
//! - When a queued-flavor subscription ends, the terminal [`SUB_END`]
//!   envelope is the last one its queue delivers: the signal for an
//!   async-task consumer to release its own resources.
//! - A subscription's private data is released exactly once, only after the
//!   subscription is inactive, its envelopes are drained, and no external
//!   handle remains.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use tokio::sync::Notify;
//! use evhub::{EventQueue, EventType, Handler, Payload, SubList, SubSpec, SyncFn, SyncEvent};
//!
//! const SERVER: u8 = 1;
//! const ADD: u8 = 0;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let list = SubList::new();
//!
//!     // Inline subscriber: sees live payload data on the publishing thread.
//!     list.subscribe(SubSpec::new(
//!         EventType::family_wide(SERVER),
//!         Handler::sync(SyncFn::new("log", |ev: &SyncEvent<'_>| {
//!             println!("server event: {}", ev.event_type());
//!         })),
//!     ))
//!     .unwrap();
//!
//!     // Task subscriber: drains frozen copies from its own queue when woken.
//!     let queue = Arc::new(EventQueue::new());
//!     let wake = Arc::new(Notify::new());
//!     list.subscribe(SubSpec::new(
//!         EventType::new(SERVER, ADD),
//!         Handler::task(Arc::clone(&queue), Arc::clone(&wake)),
//!     ))
//!     .unwrap();
//!
//!     list.publish(EventType::new(SERVER, ADD), Some(&Payload::new(b"name=web1")));
//!
//!     wake.notified().await;
//!     while let Some(env) = queue.pop() {
//!         if env.is_end() {
//!             break;
//!         }
//!         println!("queued copy: {:?}", env.data());
//!     }
//! }
//! ```
//!
//! ---

mod config;
mod error;
mod event;
mod hub;
mod sub;

// ---- Public re-exports ----

pub use config::HubConfig;
pub use error::HubError;
pub use event::{
    register_family, register_subtype, EventType, Payload, CONTROL_FAMILY, DEFAULT_SAFE_CAPACITY,
    SUB_END,
};
pub use hub::{
    global, init, lookup_resubscribe, lookup_take, lookup_unsubscribe, publish, shutdown, sub_id,
    subscribe, subscribe_ptr,
};
pub use sub::{
    AsyncFn, AsyncHandler, Envelope, EventQueue, Handler, SubList, SubRef, SubSpec, SyncEvent,
    SyncFn, SyncHandler, TaskWaker,
};
