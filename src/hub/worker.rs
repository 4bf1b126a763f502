//! # Drain workers for async-handler subscriptions.
//!
//! Each async-handler subscription gets one dedicated worker task that pops
//! its inline-held queue and invokes the handler envelope by envelope, in
//! publish order. The worker exits when it pops the subscription's terminal
//! envelope, which the end-of-life flip guarantees is the last one, so it
//! never needs a cancellation side channel, and it drops the final
//! references that let the subscription's storage go away.
//!
//! Handler panics are caught and logged; the worker moves on to the next
//! envelope, so one bad event cannot wedge the subscription.

use std::sync::Arc;

use futures::FutureExt;

use crate::sub::{Handler, SubCore};

/// Spawns the drain worker for an async-handler subscription.
///
/// Must be called from within a tokio runtime; subscribe checks this
/// before the subscription is inserted.
pub(crate) fn spawn(core: Arc<SubCore>) {
    let (queue, notify) = match &core.handler {
        Handler::Async { queue, notify, .. } => (Arc::clone(queue), Arc::clone(notify)),
        _ => return,
    };
    tokio::spawn(async move {
        let Handler::Async { handler, .. } = &core.handler else {
            return;
        };
        loop {
            while let Some(env) = queue.pop() {
                if env.is_end() {
                    tracing::trace!(serial = core.serial, "drain worker stopping");
                    return;
                }
                let fut = handler.on_event(&env);
                if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    let info = {
                        let any = &*panic_err;
                        if let Some(msg) = any.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = any.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        }
                    };
                    tracing::error!(handler = handler.name(), %info, "async handler panicked");
                }
            }
            notify.notified().await;
        }
    });
}
