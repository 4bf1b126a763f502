//! # Subscriptions: records, lists, queues, handlers.
//!
//! ## Architecture
//! ```text
//! publish(event)
//!     │  walk sublist in insertion order
//!     ├──► Sync member ──────► handler runs inline on the publishing thread
//!     ├──► Async member ─────► [queue] ──► drain worker ──► handler.on_event()
//!     │                                        └─ panic → caught, logged
//!     └──► Task member ──────► [user queue] ──► waker.wake() ──► user task pops
//! ```
//!
//! ## Rules
//! - **Per-subscription FIFO**: each queue delivers envelopes in publish order
//! - **No cross-subscription ordering**: distinct consumers race
//! - **Terminal envelope**: when a queued-flavor subscription ends, the last
//!   envelope its queue delivers for it is the `SUB_END` control event
//! - **Storage release**: a subscription's storage and private data go away
//!   only after it is inactive, its envelopes are drained, and no external
//!   handle remains

mod envelope;
mod handler;
mod list;
mod queue;
mod spec;
mod subscription;

pub use envelope::Envelope;
pub use handler::{AsyncFn, AsyncHandler, Handler, SyncFn, SyncHandler, TaskWaker};
pub use list::SubList;
pub use queue::EventQueue;
pub use spec::SubSpec;
pub use subscription::{SubRef, SyncEvent};

pub(crate) use subscription::SubCore;
