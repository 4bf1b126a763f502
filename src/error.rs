//! # Error types used by the event hub.
//!
//! Contract violations that indicate programmer error (publishing a reserved
//! family, payloads larger than the envelope capacity, multi-bit publish)
//! are not represented here; those paths assert. [`HubError`] covers the
//! recoverable failures a caller can meaningfully react to.

use thiserror::Error;

/// # Errors produced by the subscription and dispatch surface.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HubError {
    /// An event filter's family may never change for a live subscription,
    /// and two types can only be combined within one family.
    #[error("event family {found} does not match family {expected}")]
    FamilyMismatch {
        /// Family the subscription (or left-hand type) already carries.
        expected: u8,
        /// Family that was offered instead.
        found: u8,
    },

    /// Name lookup failed: the string resolves to no registered event type.
    #[error("unknown event name '{name}'")]
    UnknownEvent {
        /// The string that failed to resolve.
        name: String,
    },

    /// The target sublist has been destroyed and accepts no new members.
    #[error("sublist is destroyed")]
    Destroyed,

    /// Async-handler subscriptions need a tokio runtime to host their
    /// drain worker, and none is entered on the current thread.
    #[error("async handler subscriptions require a running tokio runtime")]
    NoRuntime,

    /// No identified subscription with the given id exists in the list.
    #[error("no subscription with id {id:#018x}")]
    NotFound {
        /// The id that was looked up.
        id: u64,
    },
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::FamilyMismatch { .. } => "hub_family_mismatch",
            HubError::UnknownEvent { .. } => "hub_unknown_event",
            HubError::Destroyed => "hub_sublist_destroyed",
            HubError::NoRuntime => "hub_no_runtime",
            HubError::NotFound { .. } => "hub_not_found",
        }
    }
}
