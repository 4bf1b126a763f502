//! # Per-subscription delivery queue.
//!
//! [`EventQueue`] is a multi-producer FIFO of [`Envelope`]s. Publishers push
//! from any thread; a single consumer drains with non-blocking [`pop`]
//! calls. The queue carries no waiting primitive of its own; the hub pairs
//! it with a wakeup token and invokes that token whenever a push makes the
//! queue non-empty, so a consumer that drains to empty after every wakeup
//! never misses an envelope.
//!
//! For async-task subscriptions the queue is owned by the user and must
//! outlive every subscription that targets it; the final envelope it
//! delivers for a subscription is the terminal `SUB_END`.
//!
//! [`pop`]: EventQueue::pop

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::envelope::Envelope;

/// Unbounded MPSC FIFO of queued event envelopes.
#[derive(Default)]
pub struct EventQueue {
    items: Mutex<VecDeque<Envelope>>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an envelope; returns whether the queue was empty before.
    ///
    /// The caller wakes the consumer on an empty-to-non-empty transition.
    pub(crate) fn push(&self, env: Envelope) -> bool {
        let mut items = self.items.lock();
        let was_empty = items.is_empty();
        items.push_back(env);
        was_empty
    }

    /// Removes and returns the oldest envelope, if any. Never blocks.
    pub fn pop(&self) -> Option<Envelope> {
        self.items.lock().pop_front()
    }

    /// Number of envelopes currently queued.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}
