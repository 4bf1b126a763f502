//! # Event types and payloads.
//!
//! An event type is a `(family, subtype bitmask)` pair: up to 256 families,
//! 16 subtypes per family. A subscription filter may cover several subtypes
//! of one family at once (or the whole family); a published event always
//! carries exactly one subtype bit.
//!
//! Family 0 is reserved for control events emitted by the hub itself. The
//! only such event is [`SUB_END`], delivered to async-task subscribers when
//! their subscription ends.

mod names;
mod payload;
mod types;

pub use names::{register_family, register_subtype};
pub use payload::{Payload, DEFAULT_SAFE_CAPACITY};
pub use types::{EventType, CONTROL_FAMILY, SUB_END};
